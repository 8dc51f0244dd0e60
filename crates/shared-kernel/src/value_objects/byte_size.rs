// crates/shared-kernel/src/value_objects/byte_size.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte count used for buffer and chunk sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[must_use]
#[repr(transparent)]
#[serde(transparent)]
pub struct ByteSize(usize);

impl ByteSize {
    pub const KIB: Self = Self(1 << 10);
    pub const MIB: Self = Self(1 << 20);

    #[inline]
    pub const fn new(bytes: usize) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn kib(n: usize) -> Self {
        Self(n << 10)
    }

    #[inline]
    pub const fn mib(n: usize) -> Self {
        Self(n << 20)
    }

    #[inline]
    pub const fn bytes(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns a base-2 human readable representation (KiB, MiB, GiB).
    pub fn to_human(self) -> String {
        const KIB: f64 = 1024.0;
        let bytes = self.0;
        if bytes < 1024 {
            return format!("{bytes} B");
        }

        let kib = bytes as f64 / KIB;
        if kib < KIB {
            return format!("{kib:.1} KiB");
        }

        let mib = kib / KIB;
        if mib < KIB {
            return format!("{mib:.1} MiB");
        }

        format!("{:.1} GiB", mib / KIB)
    }
}

impl From<usize> for ByteSize {
    fn from(bytes: usize) -> Self {
        Self::new(bytes)
    }
}

impl From<ByteSize> for usize {
    fn from(size: ByteSize) -> Self {
        size.bytes()
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() { write!(f, "{}", self.to_human()) } else { write!(f, "{}", self.0) }
    }
}
