//! Blob-storage implementations.

mod fs;

pub use fs::FsStorage;
