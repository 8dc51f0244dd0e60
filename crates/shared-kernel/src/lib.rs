// crates/shared-kernel/src/lib.rs
//! Error taxonomy and value objects shared by every simple_file_io crate.

pub use error::{FileIoError, IoErrorKind, Result, format_io_error};

pub mod error;
pub mod value_objects;

pub use value_objects::{AccessMode, ByteSize, HandleMode, OpenMode};
