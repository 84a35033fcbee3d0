use thiserror::Error;

use crate::Version;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("too small image size ({len} bytes, checksum byte at offset {offset})")]
    TooSmall { len: usize, offset: u64 },

    #[error(transparent)]
    Version(#[from] VersionError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    /// Fewer than six fields matched. `parsed` holds the ones that did.
    #[error("Version {input} doesn't match supported 6-digits format")]
    Incomplete {
        input: String,
        matched: usize,
        parsed: Version,
    },

    #[error("hardware version {0:?} is not <major>.<minor>")]
    Pair(String),

    #[error("at most {max} hardware versions fit in the tail, got {got}")]
    TooManyHw { max: usize, got: usize },
}
