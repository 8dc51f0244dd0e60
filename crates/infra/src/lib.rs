// crates/infra/src/lib.rs
//! Buffered file readers and writers over the [`simple_file_io_ports`]
//! platform API.
//!
//! - [`persistence`]: the line buffer, bulk reads, chunked writes and the
//!   single-role [`TextReader`], [`TextWriter`], [`ByteReader`] and
//!   [`ByteWriter`]
//! - [`handle`]: [`File`], one handle validating its [`OpenMode`] at open
//! - [`filesystem`]: the `std::fs` backend
//!
//! [`OpenMode`]: simple_file_io_shared_kernel::OpenMode

pub mod filesystem;
pub mod handle;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod persistence;

pub use filesystem::OsFileSystem;
pub use handle::File;
#[cfg(any(test, feature = "test-support"))]
pub use memory::{MemoryFile, MemoryFileSystem};
pub use persistence::{ByteReader, ByteWriter, LineBuffer, Lines, TextReader, TextWriter};
