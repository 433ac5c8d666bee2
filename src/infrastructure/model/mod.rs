//! Model artifact persistence

mod fs_repository;

pub use fs_repository::{FsModelRepository, DIGEST_SUFFIX, METADATA_FILE_NAME};
