//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the StorageClient trait from s3cm-core.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use s3cm_core::{Credentials, Error, ListResult, ObjectInfo, Result, StorageClient};

/// Region that takes no location constraint on bucket creation
const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    region: String,
}

impl S3Client {
    /// Create a new S3 client from configured credentials
    pub async fn new(credentials: &Credentials) -> Result<Self> {
        let static_credentials = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3cm-static-credentials",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(static_credentials)
            .region(aws_config::Region::new(credentials.region.clone()));

        if let Some(endpoint) = &credentials.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(credentials.force_path_style())
            .build();

        tracing::debug!(
            region = %credentials.region,
            endpoint = ?credentials.endpoint,
            path_style = credentials.force_path_style(),
            "S3 client configured"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            region: credentials.region.clone(),
        })
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        if self.region == DEFAULT_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }
}

/// The parts of an SDK error used to classify it
#[derive(Debug)]
struct Failure {
    status: Option<u16>,
    code: Option<String>,
    message: String,
}

impl Failure {
    fn from_sdk<E>(err: &SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        Self {
            status: err.raw_response().map(|r| r.status().as_u16()),
            code: err.code().map(str::to_string),
            message: DisplayErrorContext(err).to_string(),
        }
    }

    fn is_not_found(&self) -> bool {
        self.status == Some(404)
            || matches!(
                self.code.as_deref(),
                Some("NotFound" | "NoSuchKey" | "NoSuchBucket")
            )
    }

    fn is_forbidden(&self) -> bool {
        self.status == Some(403)
            || matches!(
                self.code.as_deref(),
                Some(
                    "AccessDenied"
                        | "Forbidden"
                        | "AllAccessDisabled"
                        | "InvalidAccessKeyId"
                        | "SignatureDoesNotMatch"
                )
            )
    }

    fn into_error(self, target: impl std::fmt::Display) -> Error {
        if self.is_not_found() {
            Error::NotFound(target.to_string())
        } else if self.is_forbidden() {
            Error::Auth(self.message)
        } else {
            Error::Network(self.message)
        }
    }
}

/// Page through bucket names until `bucket` turns up or the listing ends
async fn find_in_pages<F, Fut>(bucket: &str, mut fetch_page: F) -> Result<bool>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<(Vec<String>, Option<String>)>>,
{
    let mut continuation_token = None;
    loop {
        let (names, next) = fetch_page(continuation_token).await?;
        if names.iter().any(|name| name == bucket) {
            return Ok(true);
        }
        match next {
            Some(token) => continuation_token = Some(token),
            None => return Ok(false),
        }
    }
}

#[async_trait]
impl StorageClient for S3Client {
    async fn account_owner(&self) -> Result<Option<String>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| Failure::from_sdk(&e).into_error("account"))?;

        Ok(response
            .owner()
            .and_then(|o| o.display_name())
            .map(str::to_string))
    }

    async fn owns_bucket(&self, bucket: &str) -> Result<bool> {
        // ListBuckets only returns buckets owned by the caller
        find_in_pages(bucket, |continuation_token| async move {
            let response = self
                .inner
                .list_buckets()
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| Failure::from_sdk(&e).into_error(bucket))?;

            let names = response
                .buckets()
                .iter()
                .filter_map(|b| b.name().map(str::to_string))
                .collect();
            Ok((names, response.continuation_token().map(str::to_string)))
        })
        .await
    }

    async fn owned_by_other(&self, bucket: &str) -> Result<bool> {
        match self.inner.head_bucket().bucket(bucket).send().await {
            // Reachable but not in our own listing
            Ok(_) => Ok(true),
            Err(e) => {
                let failure = Failure::from_sdk(&e);
                if failure.is_not_found() {
                    Ok(false)
                } else if failure.is_forbidden() || failure.status == Some(301) {
                    Ok(true)
                } else {
                    Err(Error::Network(failure.message))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let request = self
            .inner
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(self.location_constraint());

        let Err(e) = request.send().await else {
            return Ok(());
        };

        let failure = Failure::from_sdk(&e);
        match failure.code.as_deref() {
            Some("BucketAlreadyOwnedByYou") => {
                tracing::debug!(bucket, "bucket already owned by caller");
                Ok(())
            }
            Some("BucketAlreadyExists") => Err(Error::Conflict(format!(
                "bucket name '{bucket}' was claimed by another account"
            ))),
            _ if failure.is_forbidden() => Err(Error::Auth(failure.message)),
            _ => Err(Error::Network(failure.message)),
        }
    }

    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(|e| Failure::from_sdk(&e).into_error(format!("bucket {bucket}")))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info =
                    ObjectInfo::new(object.key().unwrap_or_default(), object.size().unwrap_or(0));
                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }
                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }
                info
            })
            .collect();

        let continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListResult {
            items,
            continuation_token,
        })
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        match self.inner.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let failure = Failure::from_sdk(&e);
                if failure.is_not_found() {
                    Ok(false)
                } else {
                    Err(failure.into_error(format!("{bucket}/{key}")))
                }
            }
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Failure::from_sdk(&e).into_error(format!("{bucket}/{key}")))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_content_type(content_type.clone())
            .send()
            .await
            .map_err(|e| Failure::from_sdk(&e).into_error(format!("bucket {bucket}")))?;

        let mut info = ObjectInfo::new(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.content_type = content_type;
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn edit_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        if !self.object_exists(bucket, key).await? {
            return Err(Error::NotFound(format!("{bucket}/{key}")));
        }
        self.put_object(bucket, key, data, content_type).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        // DeleteObject succeeds for missing keys, so check first
        if !self.object_exists(bucket, key).await? {
            return Err(Error::NotFound(format!("{bucket}/{key}")));
        }

        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Failure::from_sdk(&e).into_error(format!("{bucket}/{key}")))?;

        tracing::debug!(bucket, key, "object deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: Option<u16>, code: Option<&str>) -> Failure {
        Failure {
            status,
            code: code.map(str::to_string),
            message: "service error".to_string(),
        }
    }

    #[test]
    fn test_failure_not_found() {
        assert!(failure(Some(404), None).is_not_found());
        assert!(failure(None, Some("NoSuchKey")).is_not_found());
        assert!(failure(None, Some("NoSuchBucket")).is_not_found());
        assert!(!failure(Some(500), Some("InternalError")).is_not_found());
    }

    #[test]
    fn test_failure_forbidden() {
        assert!(failure(Some(403), None).is_forbidden());
        assert!(failure(None, Some("AccessDenied")).is_forbidden());
        assert!(failure(None, Some("InvalidAccessKeyId")).is_forbidden());
        assert!(!failure(Some(404), None).is_forbidden());
    }

    #[test]
    fn test_failure_into_error() {
        assert!(matches!(
            failure(Some(404), None).into_error("b/k"),
            Error::NotFound(ref t) if t == "b/k"
        ));
        assert!(matches!(
            failure(Some(403), None).into_error("b/k"),
            Error::Auth(_)
        ));
        assert!(matches!(
            failure(Some(503), Some("SlowDown")).into_error("b/k"),
            Error::Network(_)
        ));
    }

    #[tokio::test]
    async fn test_location_constraint() {
        let mut credentials = Credentials::new("access", "secret");
        credentials.endpoint = Some("http://localhost:9000".into());

        let client = S3Client::new(&credentials).await.unwrap();
        assert!(client.location_constraint().is_none());

        credentials.region = "eu-west-1".into();
        let client = S3Client::new(&credentials).await.unwrap();
        let constraint = client.location_constraint().unwrap();
        assert_eq!(
            constraint.location_constraint(),
            Some(&BucketLocationConstraint::EuWest1)
        );
    }

    fn pages() -> Vec<(Vec<String>, Option<String>)> {
        vec![
            (vec!["alpha".into(), "beta".into()], Some("1".into())),
            (vec!["gamma".into()], None),
        ]
    }

    #[tokio::test]
    async fn test_owned_bucket_found_on_later_page() {
        let pages = pages();
        let mut requested = Vec::new();
        let found = find_in_pages("gamma", |token: Option<String>| {
            requested.push(token.clone());
            let page = pages[token.map_or(0, |t| t.parse::<usize>().unwrap())].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert!(found);
        assert_eq!(requested, [None, Some("1".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_bucket_reads_every_page() {
        let pages = pages();
        let mut calls = 0;
        let found = find_in_pages("delta", |token: Option<String>| {
            calls += 1;
            let page = pages[token.map_or(0, |t| t.parse::<usize>().unwrap())].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert!(!found);
        assert_eq!(calls, 2);
    }
}
