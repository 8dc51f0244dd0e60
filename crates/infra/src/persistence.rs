// crates/infra/src/persistence.rs
//! Buffered readers and writers.

pub mod bulk;
pub mod chunked;
pub mod file_reader;
pub mod file_writer;
pub mod line_buffer;

pub use file_reader::{ByteReader, Lines, TextReader};
pub use file_writer::{ByteWriter, TextWriter};
pub use line_buffer::LineBuffer;
