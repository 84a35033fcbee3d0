use crate::{TailRecord, VersionError, VersionPair};

/// The six numbers carried by an asuswrt firmware version such as
/// `3.0.0.4.382.52482`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Version {
    pub kernel: VersionPair,
    pub fs: VersionPair,
    pub sn: u16,
    pub en: u16,
}

pub const FIELDS: usize = 6;

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    /// One `%u` conversion: optional leading whitespace and sign, then
    /// decimal digits. A minus sign negates modulo 2^64 and values past
    /// `u64::MAX` saturate, as `strtoul` does.
    fn number(&mut self) -> Option<u64> {
        let s = self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let len = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if len == 0 {
            return None;
        }

        let value = s[..len]
            .bytes()
            .try_fold(0u64, |acc, d| acc.checked_mul(10)?.checked_add(u64::from(d - b'0')));
        self.rest = &s[len..];

        Some(match value {
            Some(v) if negative => v.wrapping_neg(),
            Some(v) => v,
            None => u64::MAX,
        })
    }

    fn dot(&mut self) -> Option<()> {
        self.rest = self.rest.strip_prefix('.')?;
        Some(())
    }
}

impl Version {
    /// Parses the fields positionally, stopping at the first one that is
    /// missing or not a number. Numbers wider than their field keep the low
    /// bits. Anything after the sixth field is ignored.
    ///
    /// On a short match the error still carries the fields that did parse,
    /// with zeros for the rest.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let mut parsed = Self::default();
        let matched = parsed.scan(&mut Cursor { rest: input });

        if matched == FIELDS {
            Ok(parsed)
        } else {
            Err(VersionError::Incomplete {
                input: input.into(),
                matched,
                parsed,
            })
        }
    }

    fn scan(&mut self, cur: &mut Cursor) -> usize {
        let mut matched = 0;

        macro_rules! field {
            ($dst:expr) => {
                if matched > 0 && cur.dot().is_none() {
                    return matched;
                }
                match cur.number() {
                    // truncated to the field width like %hhu / %hu
                    Some(v) => $dst = v as _,
                    None => return matched,
                }
                matched += 1;
            };
        }

        field!(self.kernel.major);
        field!(self.kernel.minor);
        field!(self.fs.major);
        field!(self.fs.minor);
        field!(self.sn);
        field!(self.en);

        matched
    }

    pub fn apply(&self, tail: &mut TailRecord) {
        tail.kernel = self.kernel;
        tail.fs = self.fs;
        tail.sn = self.sn;
        tail.en = self.en;
    }
}
