use core::fmt;

use crc_any::CRCu32;

use crate::layout::{self, HEADER_SIZE, TAIL_SIZE};
use crate::{Error, TailRecord};

/// CRC-32 as computed by zlib's `crc32()`, which is what U-Boot checks.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = CRCu32::crc32();
    c.digest(data);
    c.get_crc()
}

/// Read-only view of the 64-byte header at the front of an image.
#[derive(Copy, Clone)]
pub struct LegacyHeader<'a> {
    raw: &'a [u8; HEADER_SIZE],
}

impl<'a> LegacyHeader<'a> {
    pub fn new(image: &'a [u8]) -> Result<Self, Error> {
        let raw: &[u8; HEADER_SIZE] = image
            .get(..HEADER_SIZE)
            .and_then(|h| h.try_into().ok())
            .ok_or(Error::TooSmall {
                len: image.len(),
                offset: HEADER_SIZE as u64,
            })?;
        Ok(Self { raw })
    }

    pub fn magic(&self) -> u32 {
        layout::MAGIC.get(self.raw)
    }

    pub fn hcrc(&self) -> u32 {
        layout::HCRC.get(self.raw)
    }

    pub fn time(&self) -> u32 {
        layout::TIME.get(self.raw)
    }

    pub fn size(&self) -> u32 {
        layout::SIZE.get(self.raw)
    }

    pub fn load(&self) -> u32 {
        layout::LOAD.get(self.raw)
    }

    pub fn ep(&self) -> u32 {
        layout::EP.get(self.raw)
    }

    pub fn dcrc(&self) -> u32 {
        layout::DCRC.get(self.raw)
    }

    /// `(os, arch, type, comp)`
    pub fn kind(&self) -> (u8, u8, u8, u8) {
        (
            self.raw[layout::OS.offset],
            self.raw[layout::ARCH.offset],
            self.raw[layout::TYPE.offset],
            self.raw[layout::COMP.offset],
        )
    }

    pub fn name(&self) -> &'a [u8] {
        &self.raw[layout::NAME.range()]
    }

    pub fn tail(&self) -> TailRecord {
        let mut buf = [0u8; TAIL_SIZE];
        buf.copy_from_slice(self.name());
        TailRecord::decode(&buf)
    }

    /// CRC of the header with its own CRC field taken as zero.
    pub fn compute_hcrc(&self) -> u32 {
        let mut copy = *self.raw;
        copy[layout::HCRC.range()].fill(0);
        crc32(&copy)
    }

    pub fn verify_crc(&self) -> bool {
        self.compute_hcrc() == self.hcrc()
    }
}

impl fmt::Debug for LegacyHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LegacyHeader")
            .field("magic", &format_args!("0x{:08x}", self.magic()))
            .field("hcrc", &format_args!("0x{:08x}", self.hcrc()))
            .field("time", &self.time())
            .field("size", &self.size())
            .field("load", &format_args!("0x{:08x}", self.load()))
            .field("ep", &format_args!("0x{:08x}", self.ep()))
            .field("dcrc", &format_args!("0x{:08x}", self.dcrc()))
            .field("kind", &self.kind())
            .finish()
    }
}
