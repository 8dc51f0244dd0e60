// crates/domain/src/config.rs
pub mod io_options;
pub mod strategy;

pub use io_options::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_READ_RESERVE, DEFAULT_WRITE_CHUNK, IoOptions, IoOptionsBuilder,
    IoOptionsBuilderError, MAX_READ_RESERVE,
};
pub use strategy::BulkReadStrategy;
