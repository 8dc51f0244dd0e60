// crates/ports/src/lib.rs
//! # Ports
//!
//! Interface definitions for the platform file API.
//!
//! - [`filesystem`]: opening descriptors by access mode and existence checks
//!
//! Readers, writers and the unified handle are generic over these traits so
//! the OS backend can be swapped for an in-memory one in tests.

pub mod filesystem;

pub use filesystem::{FileSystem, RawFile};
