// crates/domain/src/lib.rs
//! Tuning options shared by the readers, writers and unified handle.

pub mod config;

pub use config::{BulkReadStrategy, IoOptions, IoOptionsBuilder, IoOptionsBuilderError};
