// crates/shared-kernel/src/value_objects/open_mode.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FileIoError, Result};

bitflags::bitflags! {
    /// Flags requested when opening a file handle.
    ///
    /// Exactly one of `READ`, `WRITE` or `APPEND` must be present. `BINARY`
    /// is orthogonal and selects byte-oriented operations over text ones.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenMode: u8 {
        const READ = 1 << 0;
        /// Truncates an existing file.
        const WRITE = 1 << 1;
        /// Extends an existing file, creating it if missing.
        const APPEND = 1 << 2;
        const BINARY = 1 << 3;
    }
}

impl Default for OpenMode {
    fn default() -> Self {
        Self::empty()
    }
}

impl OpenMode {
    const DIRECTIONS: Self = Self::READ.union(Self::WRITE).union(Self::APPEND);

    /// Checks the "exactly one direction" rule and returns the validated mode.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when zero or several of `READ`, `WRITE`
    /// and `APPEND` are set.
    pub fn validate(self) -> Result<HandleMode> {
        let access = match self.intersection(Self::DIRECTIONS) {
            d if d == Self::READ => AccessMode::Read,
            d if d == Self::WRITE => AccessMode::Write,
            d if d == Self::APPEND => AccessMode::Append,
            d if d.is_empty() => {
                return Err(FileIoError::configuration(
                    "open mode must include one of Read, Write or Append",
                ));
            }
            d => {
                return Err(FileIoError::configuration(format!(
                    "open mode {d:?} combines more than one of Read, Write or Append"
                )));
            }
        };
        Ok(HandleMode { access, binary: self.contains(Self::BINARY) })
    }
}

/// Direction a handle was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
    Append,
}

impl AccessMode {
    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }

    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write | Self::Append)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open mode that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct HandleMode {
    access: AccessMode,
    binary: bool,
}

impl HandleMode {
    pub const fn new(access: AccessMode, binary: bool) -> Self {
        Self { access, binary }
    }

    #[inline]
    pub const fn access(self) -> AccessMode {
        self.access
    }

    #[inline]
    pub const fn is_binary(self) -> bool {
        self.binary
    }

    pub fn open_mode(self) -> OpenMode {
        let direction = match self.access {
            AccessMode::Read => OpenMode::READ,
            AccessMode::Write => OpenMode::WRITE,
            AccessMode::Append => OpenMode::APPEND,
        };
        if self.binary { direction | OpenMode::BINARY } else { direction }
    }
}

impl TryFrom<OpenMode> for HandleMode {
    type Error = FileIoError;

    fn try_from(mode: OpenMode) -> Result<Self> {
        mode.validate()
    }
}

impl fmt::Display for HandleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.binary { write!(f, "{}+binary", self.access) } else { write!(f, "{}", self.access) }
    }
}
