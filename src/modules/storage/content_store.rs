use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

/// Byte stream handed back to callers for relaying file content
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Byte stream consumed by an upload; may borrow from the request body
pub type UploadStream<'a> = BoxStream<'a, std::io::Result<Bytes>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload exceeds the maximum size of {limit} bytes")]
    CapacityExceeded { limit: u64 },

    #[error("stored object not found: {0}")]
    NotFound(String),

    /// The incoming body failed before it was fully read
    #[error("upload stream interrupted: {0}")]
    Interrupted(String),

    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a completed `put`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub stored_name: String,
    /// Exact number of bytes consumed from the upload stream
    pub size_bytes: u64,
}

/// Durable byte storage keyed by stored name, independent of metadata.
///
/// Implementations must leave nothing behind when `put` fails and must
/// never let a stored name address anything outside their own namespace.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Consume `body` into a freshly named object.
    ///
    /// `original_name` only contributes its extension to the generated name.
    /// The size cap is enforced while streaming, so oversized uploads are
    /// rejected without buffering them.
    async fn put(
        &self,
        original_name: &str,
        body: UploadStream<'_>,
    ) -> Result<StoredObject, StorageError>;

    /// Open a lazy, forward-only read of the object's bytes.
    async fn open_read(&self, stored_name: &str) -> Result<ByteStream, StorageError>;

    /// Delete the object. Absent objects yield `NotFound`.
    async fn remove(&self, stored_name: &str) -> Result<(), StorageError>;
}
