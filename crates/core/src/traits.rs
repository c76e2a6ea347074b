//! StorageClient trait definition
//!
//! This trait defines the bucket and object operations the session needs from the
//! storage service. It keeps the core independent of the S3 SDK and can be mocked
//! for testing.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::Result;

/// Metadata for an object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// Human-readable size
    pub size_human: String,

    /// Last modified timestamp
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    pub etag: Option<String>,

    /// Content type
    pub content_type: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of `size` bytes
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: size,
            size_human: humansize::format_size(size.max(0) as u64, humansize::BINARY),
            last_modified: None,
            etag: None,
            content_type: None,
        }
    }
}

/// One page of a bucket listing
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// Listed objects
    pub items: Vec<ObjectInfo>,

    /// Continuation token when more objects are available
    pub continuation_token: Option<String>,
}

impl ListResult {
    pub fn is_truncated(&self) -> bool {
        self.continuation_token.is_some()
    }
}

/// Trait for the storage service operations used by a session
///
/// Implemented by the S3 adapter; ownership checks feed the bucket resolver and the
/// object operations back the interactive menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Display name of the account the credentials belong to
    async fn account_owner(&self) -> Result<Option<String>>;

    /// Whether the calling account already owns a bucket with this name
    async fn owns_bucket(&self, bucket: &str) -> Result<bool>;

    /// Whether a bucket with this name exists and belongs to a different account
    async fn owned_by_other(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket
    ///
    /// A name claimed by another account since the last check is reported as
    /// [`Error::Conflict`](crate::Error::Conflict).
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// List one page of objects, starting after `continuation_token`
    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult>;

    /// Check whether an object exists
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Get object content as bytes
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Upload an object, replacing any existing content
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Replace the content of an existing object
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if the key does not exist.
    async fn edit_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_new() {
        let info = ObjectInfo::new("alice.vcf", 2048);
        assert_eq!(info.key, "alice.vcf");
        assert_eq!(info.size_bytes, 2048);
        assert_eq!(info.size_human, "2 KiB");
        assert!(info.etag.is_none());
    }

    #[test]
    fn test_list_result_truncation() {
        let page = ListResult {
            items: vec![ObjectInfo::new("a", 1)],
            continuation_token: Some("next".into()),
        };
        assert!(page.is_truncated());
        assert!(!ListResult::default().is_truncated());
    }
}
