//! Bucket acquisition
//!
//! Decides whether a validated bucket name can be used by the current account,
//! creating the bucket when the name is free. Ownership is looked up fresh on every
//! call since it can change between attempts.

use std::fmt;

use thiserror::Error;

use crate::bucket_name::BucketName;
use crate::error::Error;
use crate::traits::StorageClient;

/// Who holds a bucket name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipStatus {
    /// The calling account owns the bucket
    OwnedByCaller,
    /// The name is taken by a different account
    OwnedByOther,
    /// Nobody holds the name
    Available,
}

impl fmt::Display for OwnershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OwnershipStatus::OwnedByCaller => "owned by caller",
            OwnershipStatus::OwnedByOther => "owned by another account",
            OwnershipStatus::Available => "available",
        };
        f.write_str(s)
    }
}

/// Why acquiring a bucket did not happen
///
/// Every variant is recoverable: the session asks for another name.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The name belongs to a different account
    #[error("Another account already owns bucket {0}")]
    OwnershipConflict(BucketName),

    /// Creating the bucket failed, including losing the race for a free name
    #[error("There was a problem creating bucket {bucket}: {source}")]
    Provision {
        bucket: BucketName,
        #[source]
        source: Error,
    },

    /// Ownership could not be determined
    #[error("Could not check ownership of bucket {bucket}: {source}")]
    Lookup {
        bucket: BucketName,
        #[source]
        source: Error,
    },
}

/// A bucket the current account may operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketHandle {
    name: BucketName,
    created: bool,
}

impl BucketHandle {
    pub fn name(&self) -> &BucketName {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    /// Whether the bucket was provisioned during this acquisition
    pub fn was_created(&self) -> bool {
        self.created
    }
}

impl fmt::Display for BucketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Resolves ownership of bucket names and provisions free ones
pub struct BucketResolver<'a> {
    store: &'a dyn StorageClient,
}

impl<'a> BucketResolver<'a> {
    pub fn new(store: &'a dyn StorageClient) -> Self {
        Self { store }
    }

    /// Look up who holds `name` without creating anything
    pub async fn ownership(&self, name: &BucketName) -> crate::Result<OwnershipStatus> {
        if self.store.owns_bucket(name.as_str()).await? {
            return Ok(OwnershipStatus::OwnedByCaller);
        }
        if self.store.owned_by_other(name.as_str()).await? {
            return Ok(OwnershipStatus::OwnedByOther);
        }
        Ok(OwnershipStatus::Available)
    }

    /// Resolve `name`, creating the bucket if nobody holds it
    ///
    /// Returns either `OwnedByCaller` or `OwnedByOther`. A failed create is not
    /// retried.
    pub async fn resolve(&self, name: &BucketName) -> Result<OwnershipStatus, AcquireError> {
        Ok(match self.settle(name).await? {
            Outcome::Existing | Outcome::Created => OwnershipStatus::OwnedByCaller,
            Outcome::Taken => OwnershipStatus::OwnedByOther,
        })
    }

    /// Acquire `name` for the session
    ///
    /// Succeeds only when the caller ends up owning the bucket, whether it already
    /// existed or was just created.
    pub async fn acquire(&self, name: BucketName) -> Result<BucketHandle, AcquireError> {
        match self.settle(&name).await? {
            Outcome::Existing => Ok(BucketHandle {
                name,
                created: false,
            }),
            Outcome::Created => Ok(BucketHandle {
                name,
                created: true,
            }),
            Outcome::Taken => Err(AcquireError::OwnershipConflict(name)),
        }
    }

    async fn settle(&self, name: &BucketName) -> Result<Outcome, AcquireError> {
        let status = self
            .ownership(name)
            .await
            .map_err(|source| AcquireError::Lookup {
                bucket: name.clone(),
                source,
            })?;
        tracing::debug!(bucket = %name, %status, "resolved bucket ownership");

        match status {
            OwnershipStatus::OwnedByCaller => Ok(Outcome::Existing),
            OwnershipStatus::OwnedByOther => Ok(Outcome::Taken),
            OwnershipStatus::Available => {
                self.store
                    .create_bucket(name.as_str())
                    .await
                    .map_err(|source| {
                        tracing::warn!(bucket = %name, error = %source, "bucket creation failed");
                        AcquireError::Provision {
                            bucket: name.clone(),
                            source,
                        }
                    })?;
                tracing::info!(bucket = %name, "bucket created");
                Ok(Outcome::Created)
            }
        }
    }
}

enum Outcome {
    Existing,
    Created,
    Taken,
}
