//! Byte layout of the legacy image header and the vendor tail.
//!
//! Every field is addressed by explicit offset and width. Multi-byte header
//! fields are big-endian; the two 16-bit tail numbers are little-endian.

use core::ops::Range;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Order {
    Big,
    Little,
    /// Single bytes and byte strings.
    Bytes,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub order: Order,
}

impl Field {
    const fn new(name: &'static str, offset: usize, width: usize, order: Order) -> Self {
        Self { name, offset, width, order }
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Reads an integer field of at most four bytes in its own byte order.
    pub fn get(&self, buf: &[u8]) -> u32 {
        let b = &buf[self.range()];
        match self.order {
            Order::Big => b.iter().fold(0, |acc, &x| acc << 8 | u32::from(x)),
            Order::Little => b.iter().rev().fold(0, |acc, &x| acc << 8 | u32::from(x)),
            Order::Bytes => u32::from(b[0]),
        }
    }

    /// Stores the low `width` bytes of `value` in the field's byte order.
    pub fn put(&self, buf: &mut [u8], value: u32) {
        let b = &mut buf[self.range()];
        match self.order {
            Order::Big => b.copy_from_slice(&value.to_be_bytes()[4 - self.width..]),
            Order::Little => b.copy_from_slice(&value.to_le_bytes()[..self.width]),
            Order::Bytes => b[0] = value as u8,
        }
    }
}

///////////////////////////////////////////////////////////////////////////
// Legacy image header.

pub const IH_MAGIC: u32 = 0x2705_1956;
pub const IH_NMLEN: usize = 32;
pub const HEADER_SIZE: usize = 64;

pub const MAGIC: Field = Field::new("magic", 0, 4, Order::Big);
pub const HCRC: Field = Field::new("hcrc", 4, 4, Order::Big);
pub const TIME: Field = Field::new("time", 8, 4, Order::Big);
pub const SIZE: Field = Field::new("size", 12, 4, Order::Big);
pub const LOAD: Field = Field::new("load", 16, 4, Order::Big);
pub const EP: Field = Field::new("ep", 20, 4, Order::Big);
pub const DCRC: Field = Field::new("dcrc", 24, 4, Order::Big);
pub const OS: Field = Field::new("os", 28, 1, Order::Bytes);
pub const ARCH: Field = Field::new("arch", 29, 1, Order::Bytes);
pub const TYPE: Field = Field::new("type", 30, 1, Order::Bytes);
pub const COMP: Field = Field::new("comp", 31, 1, Order::Bytes);
pub const NAME: Field = Field::new("name", 32, IH_NMLEN, Order::Bytes);

pub const HEADER: [Field; 12] = [
    MAGIC, HCRC, TIME, SIZE, LOAD, EP, DCRC, OS, ARCH, TYPE, COMP, NAME,
];

///////////////////////////////////////////////////////////////////////////
// Vendor tail, overlaid on `NAME`. Offsets are relative to the tail.

pub const MAX_STRING: usize = 12;
pub const MAX_VER: usize = 5;
pub const TAIL_SIZE: usize = IH_NMLEN;

pub const KERNEL: Field = Field::new("kernel", 0, 2, Order::Bytes);
pub const FS: Field = Field::new("fs", 2, 2, Order::Bytes);
pub const PRODUCTID: Field = Field::new("productid", 4, MAX_STRING, Order::Bytes);
// The vendor tool stores these in host order, which is little-endian on
// every target it ships for.
pub const SN: Field = Field::new("sn", 16, 2, Order::Little);
pub const EN: Field = Field::new("en", 18, 2, Order::Little);
pub const PKEY: Field = Field::new("pkey", 20, 1, Order::Bytes);
pub const KEY: Field = Field::new("key", 21, 1, Order::Bytes);
pub const HW: Field = Field::new("hw", 22, 2 * MAX_VER, Order::Bytes);

pub const TAIL: [Field; 8] = [KERNEL, FS, PRODUCTID, SN, EN, PKEY, KEY, HW];

#[cfg(test)]
mod test {
    use super::*;

    fn contiguous(fields: &[Field], size: usize) {
        let mut next = 0;
        for f in fields {
            assert_eq!(f.offset, next, "{} is not packed", f.name);
            next = f.end();
        }
        assert_eq!(next, size);
    }

    #[test]
    fn header_is_packed() {
        contiguous(&HEADER, HEADER_SIZE);
    }

    #[test]
    fn tail_fills_name() {
        contiguous(&TAIL, TAIL_SIZE);
        assert_eq!(NAME.width, TAIL_SIZE);
        assert_eq!(NAME.end(), HEADER_SIZE);
    }

    #[test]
    fn byte_order() {
        let mut buf = [0u8; TAIL_SIZE];
        SN.put(&mut buf, 0x017e);
        KEY.put(&mut buf, 0x5a);
        assert_eq!(&buf[16..18], &[0x7e, 0x01]);
        assert_eq!(buf[21], 0x5a);
        assert_eq!(SN.get(&buf), 0x017e);
        assert_eq!(KEY.get(&buf), 0x5a);

        let mut hdr = [0u8; HEADER_SIZE];
        SIZE.put(&mut hdr, 1024);
        assert_eq!(&hdr[12..16], &[0, 0, 4, 0]);
        assert_eq!(SIZE.get(&hdr), 1024);
    }
}
