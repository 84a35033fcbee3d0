use log::{debug, warn};

use crate::header::crc32;
use crate::layout::{self, HEADER_SIZE, IH_MAGIC, MAX_STRING};
use crate::{Error, TailRecord};

/// Offset of the second byte sampled for the tail key: half of header plus
/// declared payload.
pub fn checksum_b_offset(data_size: u32) -> u64 {
    (u64::from(data_size) + HEADER_SIZE as u64) >> 1
}

/// Writes `tail` over the image name and recomputes the header CRC.
///
/// Before the overlay, `tail.key` is derived from the first image byte and
/// the byte at [`checksum_b_offset`], and the first `MAX_STRING - 1` bytes of
/// the existing name are copied into `tail.productid`. The last product id
/// byte keeps whatever the caller put there.
///
/// Returns the new header CRC. On error the image is untouched.
pub fn patch(image: &mut [u8], tail: &mut TailRecord) -> Result<u32, Error> {
    if image.len() < HEADER_SIZE {
        return Err(Error::TooSmall {
            len: image.len(),
            offset: HEADER_SIZE as u64,
        });
    }

    let magic = layout::MAGIC.get(image);
    if magic != IH_MAGIC {
        warn!("unexpected image magic 0x{:08x}", magic);
    }

    let offset = checksum_b_offset(layout::SIZE.get(image));
    let checksum_b = usize::try_from(offset)
        .ok()
        .and_then(|o| image.get(o))
        .copied()
        .ok_or(Error::TooSmall {
            len: image.len(),
            offset,
        })?;
    let checksum_a = image[0];

    tail.key = checksum_a.wrapping_add(!checksum_b);
    debug!(
        "checksum_a = 0x{:02x}, checksum_b = 0x{:02x} at {}, key = 0x{:02x}",
        checksum_a, checksum_b, offset, tail.key
    );

    let name = layout::NAME.offset;
    tail.productid[..MAX_STRING - 1].copy_from_slice(&image[name..name + MAX_STRING - 1]);

    image[layout::NAME.range()].copy_from_slice(&tail.encode());

    layout::HCRC.put(image, 0);
    let crc = crc32(&image[..HEADER_SIZE]);
    layout::HCRC.put(image, crc);

    Ok(crc)
}
