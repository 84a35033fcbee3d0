//! Vendor tail patching for ASUS QCA/QCN legacy uImages.
//!
//! The stock firmware checks a small record stored in the 32-byte name field
//! of the U-Boot legacy header: kernel and filesystem versions, the product
//! id, serial and extra build numbers and a key byte derived from two bytes
//! of the image. [`patch`] writes that record and fixes up the header CRC so
//! U-Boot still accepts the image.

mod error;
mod header;
pub mod layout;
mod patch;
mod tail;
mod version;

pub use error::{Error, VersionError};
pub use header::{crc32, LegacyHeader};
pub use patch::{checksum_b_offset, patch};
pub use tail::{TailRecord, VersionPair};
pub use version::Version;
