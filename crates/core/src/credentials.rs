//! Storage credentials
//!
//! Connection details and keys for the storage service, read from the
//! configuration file or from a legacy `AwsCredentials.properties` file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Keys recognised in a `.properties` credentials file
const PROPERTIES_ACCESS_KEY: &str = "accessKey";
const PROPERTIES_SECRET_KEY: &str = "secretKey";

/// Credentials and endpoint settings for the storage service
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key ID
    #[serde(default)]
    pub access_key: String,

    /// Secret access key
    #[serde(default)]
    pub secret_key: String,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom S3 endpoint URL; the AWS default endpoint is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Bucket lookup style: "auto", "path", or "dns"
    #[serde(default = "default_bucket_lookup")]
    pub bucket_lookup: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket_lookup() -> String {
    "auto".to_string()
}

impl Credentials {
    /// Create credentials with the default region and lookup style
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            endpoint: None,
            bucket_lookup: default_bucket_lookup(),
        }
    }

    /// Parse a Java-style properties file holding `accessKey` and `secretKey`
    pub fn from_properties(content: &str) -> Result<Self> {
        let mut access_key = None;
        let mut secret_key = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(['=', ':']) else {
                continue;
            };
            match key.trim() {
                PROPERTIES_ACCESS_KEY => access_key = Some(value.trim().to_string()),
                PROPERTIES_SECRET_KEY => secret_key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let access_key = access_key.ok_or_else(|| {
            Error::Credentials(format!("missing '{PROPERTIES_ACCESS_KEY}' property"))
        })?;
        let secret_key = secret_key.ok_or_else(|| {
            Error::Credentials(format!("missing '{PROPERTIES_SECRET_KEY}' property"))
        })?;

        Ok(Self::new(access_key, secret_key))
    }

    /// Check that the credentials are usable before any storage call
    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(Error::Credentials("access_key is empty".into()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::Credentials("secret_key is empty".into()));
        }
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)?;
        }
        match self.bucket_lookup.as_str() {
            "auto" | "path" | "dns" => Ok(()),
            other => Err(Error::Config(format!(
                "bucket_lookup must be one of auto, path, dns (got '{other}')"
            ))),
        }
    }

    /// Whether requests should use path-style addressing
    pub fn force_path_style(&self) -> bool {
        match self.bucket_lookup.as_str() {
            "path" => true,
            "dns" => false,
            _ => self.endpoint.is_some(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("bucket_lookup", &self.bucket_lookup)
            .finish()
    }
}
