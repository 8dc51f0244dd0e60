// crates/domain/src/config/strategy.rs
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use simple_file_io_shared_kernel::FileIoError;

/// How whole-file reads gather their bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkReadStrategy {
    /// Read fixed-size chunks into a growable buffer until a zero-byte read.
    /// Works for pipes and files that change size while being read.
    #[default]
    Chunked,
    /// Seek to the end to learn the remaining length, allocate exactly and
    /// read it in one pass. A short read is an error.
    Sized,
}

impl BulkReadStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chunked => "chunked",
            Self::Sized => "sized",
        }
    }
}

impl fmt::Display for BulkReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkReadStrategy {
    type Err = FileIoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chunked" => Ok(Self::Chunked),
            "sized" => Ok(Self::Sized),
            other => Err(FileIoError::configuration(format!("unknown bulk read strategy '{other}'"))),
        }
    }
}
