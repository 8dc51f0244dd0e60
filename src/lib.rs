// src/lib.rs
//! Buffered whole-file, line and byte I/O with fixed-size internal buffers.
//!
//! Two ways in:
//!
//! - single-role types fixed at compile time: [`TextReader`],
//!   [`TextWriter`], [`ByteReader`], [`ByteWriter`]
//! - [`File`], one handle whose [`OpenMode`] is validated at open and whose
//!   text/binary gating happens at run time
//!
//! ```no_run
//! use simple_file_io::{File, OpenMode, TextReader};
//!
//! let mut out = File::open("notes.txt", OpenMode::WRITE)?;
//! out.write_lines(&["first", "", "third"])?;
//! out.close()?;
//!
//! let mut reader = TextReader::open("notes.txt")?;
//! while let Some(line) = reader.read_line()? {
//!     println!("{line}");
//! }
//! # Ok::<(), simple_file_io::FileIoError>(())
//! ```
//!
//! End-of-file is `Ok(None)`; an empty line is `Ok(Some(String::new()))`.

pub use simple_file_io_domain::{
    BulkReadStrategy, IoOptions, IoOptionsBuilder, IoOptionsBuilderError,
};
pub use simple_file_io_infra::{
    ByteReader, ByteWriter, File, LineBuffer, Lines, OsFileSystem, TextReader, TextWriter,
};
pub use simple_file_io_ports::{FileSystem, RawFile};
pub use simple_file_io_shared_kernel::{
    AccessMode, ByteSize, FileIoError, HandleMode, IoErrorKind, OpenMode, Result, format_io_error,
};

/// In-memory backend, for callers testing code built on this crate.
#[cfg(feature = "test-support")]
pub use simple_file_io_infra::{MemoryFile, MemoryFileSystem};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
