//! s3cm-core: Core library for the s3cm bucket session tool
//!
//! This crate provides the core functionality for s3cm, including:
//! - Bucket name grammar and validation
//! - Bucket ownership resolution and provisioning
//! - Configuration and credentials loading
//! - StorageClient trait for storage operations
//!
//! This crate is independent of any specific S3 SDK, so the acquisition protocol
//! can be tested against mocks.

pub mod bucket_name;
pub mod config;
pub mod credentials;
pub mod error;
pub mod resolver;
pub mod traits;

pub use bucket_name::{BucketName, NameViolation, validate};
pub use config::{Config, ConfigManager, Defaults};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use resolver::{AcquireError, BucketHandle, BucketResolver, OwnershipStatus};
pub use traits::{ListResult, ObjectInfo, StorageClient};
