// crates/domain/src/config/io_options.rs
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use simple_file_io_shared_kernel::{ByteSize, FileIoError, Result};

use super::BulkReadStrategy;

/// Capacity of the per-handle line buffer and bulk-read scratch.
pub const DEFAULT_BUFFER_CAPACITY: ByteSize = ByteSize::mib(1);
/// Largest single write issued for raw payloads.
pub const DEFAULT_WRITE_CHUNK: ByteSize = ByteSize::mib(1);
/// Initial reservation for chunked whole-file reads.
pub const DEFAULT_READ_RESERVE: ByteSize = ByteSize::mib(4);
/// Upper bound for `read_reserve`; no allocation may exceed `isize::MAX` bytes.
pub const MAX_READ_RESERVE: ByteSize = ByteSize::new(isize::MAX as usize);

/// Buffer sizing and strategy knobs for readers and writers.
///
/// ```
/// use simple_file_io_domain::{BulkReadStrategy, IoOptions};
/// use simple_file_io_shared_kernel::ByteSize;
///
/// let options = IoOptions::builder()
///     .buffer_capacity(ByteSize::kib(64))
///     .bulk_strategy(BulkReadStrategy::Sized)
///     .build()
///     .unwrap();
/// assert_eq!(options.buffer_capacity.bytes(), 64 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct IoOptions {
    #[builder(default = "DEFAULT_BUFFER_CAPACITY")]
    pub buffer_capacity: ByteSize,
    #[builder(default = "DEFAULT_WRITE_CHUNK")]
    pub write_chunk_size: ByteSize,
    #[builder(default)]
    pub bulk_strategy: BulkReadStrategy,
    #[builder(default = "DEFAULT_READ_RESERVE")]
    pub read_reserve: ByteSize,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            write_chunk_size: DEFAULT_WRITE_CHUNK,
            bulk_strategy: BulkReadStrategy::default(),
            read_reserve: DEFAULT_READ_RESERVE,
        }
    }
}

impl IoOptions {
    pub fn builder() -> IoOptionsBuilder {
        IoOptionsBuilder::default()
    }

    /// Parses options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or invalid sizes.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| FileIoError::configuration(format!("malformed options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Re-checks invariants on options that bypassed the builder.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a size that must be non-zero is
    /// zero, or when `read_reserve` exceeds [`MAX_READ_RESERVE`].
    pub fn validate(&self) -> Result<()> {
        check_sizes(
            Some(self.buffer_capacity),
            Some(self.write_chunk_size),
            Some(self.read_reserve),
        )
        .map_err(FileIoError::configuration)
    }
}

impl IoOptionsBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        check_sizes(self.buffer_capacity, self.write_chunk_size, self.read_reserve)
    }
}

fn check_sizes(
    buffer_capacity: Option<ByteSize>,
    write_chunk_size: Option<ByteSize>,
    read_reserve: Option<ByteSize>,
) -> std::result::Result<(), String> {
    if buffer_capacity.is_some_and(ByteSize::is_zero) {
        return Err("buffer_capacity must be greater than zero".to_string());
    }
    if write_chunk_size.is_some_and(ByteSize::is_zero) {
        return Err("write_chunk_size must be greater than zero".to_string());
    }
    if let Some(reserve) = read_reserve.filter(|r| *r > MAX_READ_RESERVE) {
        return Err(format!("read_reserve of {reserve} bytes exceeds {MAX_READ_RESERVE} bytes"));
    }
    Ok(())
}

impl From<IoOptionsBuilderError> for FileIoError {
    fn from(err: IoOptionsBuilderError) -> Self {
        FileIoError::configuration(err.to_string())
    }
}
