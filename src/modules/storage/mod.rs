//! Storage module for file content
//!
//! Provides the content store abstraction and its local filesystem
//! backend. Bytes are keyed by generated stored names; metadata lives
//! elsewhere.

mod content_store;
mod local;

pub use content_store::{ByteStream, ContentStore, StorageError, UploadStream};
pub use local::LocalContentStore;
