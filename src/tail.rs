use core::fmt;
use core::str::FromStr;

use crate::layout::{self, Field, MAX_STRING, MAX_VER, TAIL_SIZE};
use crate::VersionError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionPair {
    pub major: u8,
    pub minor: u8,
}

impl VersionPair {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    fn to_bytes(self) -> [u8; 2] {
        [self.major, self.minor]
    }

    fn from_bytes(b: &[u8]) -> Self {
        Self::new(b[0], b[1])
    }
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionPair {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || VersionError::Pair(s.into());
        let (major, minor) = s.split_once('.').ok_or_else(bad)?;
        Ok(Self {
            major: major.parse().map_err(|_| bad())?,
            minor: minor.parse().map_err(|_| bad())?,
        })
    }
}

/// The vendor record stored in place of the image name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TailRecord {
    pub kernel: VersionPair,
    pub fs: VersionPair,
    pub productid: [u8; MAX_STRING],
    pub sn: u16,
    pub en: u16,
    pub pkey: u8,
    pub key: u8,
    pub hw: [VersionPair; MAX_VER],
}

fn slot<'a>(buf: &'a mut [u8; TAIL_SIZE], field: Field) -> &'a mut [u8] {
    &mut buf[field.range()]
}

impl TailRecord {
    pub fn encode(&self) -> [u8; TAIL_SIZE] {
        let mut buf = [0u8; TAIL_SIZE];

        slot(&mut buf, layout::KERNEL).copy_from_slice(&self.kernel.to_bytes());
        slot(&mut buf, layout::FS).copy_from_slice(&self.fs.to_bytes());
        slot(&mut buf, layout::PRODUCTID).copy_from_slice(&self.productid);
        layout::SN.put(&mut buf, self.sn.into());
        layout::EN.put(&mut buf, self.en.into());
        layout::PKEY.put(&mut buf, self.pkey.into());
        layout::KEY.put(&mut buf, self.key.into());

        let hw = slot(&mut buf, layout::HW);
        for (dst, v) in hw.chunks_exact_mut(2).zip(&self.hw) {
            dst.copy_from_slice(&v.to_bytes());
        }

        buf
    }

    pub fn decode(buf: &[u8; TAIL_SIZE]) -> Self {
        let mut productid = [0u8; MAX_STRING];
        productid.copy_from_slice(&buf[layout::PRODUCTID.range()]);

        let mut hw = [VersionPair::default(); MAX_VER];
        for (v, src) in hw.iter_mut().zip(buf[layout::HW.range()].chunks_exact(2)) {
            *v = VersionPair::from_bytes(src);
        }

        Self {
            kernel: VersionPair::from_bytes(&buf[layout::KERNEL.range()]),
            fs: VersionPair::from_bytes(&buf[layout::FS.range()]),
            productid,
            sn: layout::SN.get(buf) as u16,
            en: layout::EN.get(buf) as u16,
            pkey: layout::PKEY.get(buf) as u8,
            key: layout::KEY.get(buf) as u8,
            hw,
        }
    }

    /// The product id up to its first NUL.
    pub fn product(&self) -> String {
        let len = self.productid.iter().position(|&b| b == 0).unwrap_or(MAX_STRING);
        String::from_utf8_lossy(&self.productid[..len]).into_owned()
    }

    /// Fills `hw[0..n]` in order; the rest are left alone.
    pub fn set_hw(&mut self, versions: &[VersionPair]) -> Result<(), VersionError> {
        if versions.len() > MAX_VER {
            return Err(VersionError::TooManyHw {
                max: MAX_VER,
                got: versions.len(),
            });
        }

        self.hw[..versions.len()].copy_from_slice(versions);
        Ok(())
    }
}
