// crates/shared-kernel/src/value_objects/mod.rs
pub mod byte_size;
pub mod open_mode;

pub use byte_size::ByteSize;
pub use open_mode::{AccessMode, HandleMode, OpenMode};
