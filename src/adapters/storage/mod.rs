//! Storage adapters for uploaded media files.

mod local;

pub use local::LocalFileStorage;
