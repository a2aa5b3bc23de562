//! S3 client for certificate uploads.
//!
//! Credentials come from the AWS SDK default provider chain. With an endpoint
//! override (`MinIO`, `LocalStack`) requests switch to path-style addressing
//! (`{endpoint}/{bucket}/{key}`).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use tracing::instrument;
use url::Url;

use super::{ObjectAcl, ObjectStore, PutObject, StorageError};
use crate::config::StorageConfig;

impl From<ObjectAcl> for ObjectCannedAcl {
    fn from(acl: ObjectAcl) -> Self {
        match acl {
            ObjectAcl::Private => Self::Private,
            ObjectAcl::PublicRead => Self::PublicRead,
        }
    }
}

/// S3 client for uploading certificate PDFs.
#[derive(Clone)]
pub struct S3Client {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    endpoint: Option<Url>,
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl S3Client {
    /// Load the shared AWS configuration for `config.region` and build a client.
    pub async fn from_env(config: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(&sdk_config, config)
    }

    /// Build a client from an already loaded AWS configuration.
    ///
    /// `config` overrides the region and, when set, the endpoint.
    #[must_use]
    pub fn new(sdk_config: &SdkConfig, config: &StorageConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            tracing::info!(endpoint = %endpoint, "Using S3 endpoint override");
            builder = builder
                .endpoint_url(endpoint.as_str())
                .force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Bucket receiving uploads.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Percent-encode each path segment of `key`.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStore for S3Client {
    #[instrument(skip(self, object), fields(bucket = %self.bucket, key = %object.key, bytes = object.body.len()))]
    async fn put_object(&self, object: PutObject) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .acl(ObjectCannedAcl::from(object.acl))
            .content_type(object.content_type)
            .body(ByteStream::from(object.body))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                tracing::warn!(error = %message, "Object upload rejected");
                StorageError::Upload {
                    key: object.key.clone(),
                    message,
                }
            })?;

        tracing::info!("Object uploaded");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let encoded = encode_key(key);
        match &self.endpoint {
            None => format!(
                "https://{}.s3-{}.amazonaws.com/{encoded}",
                self.bucket, self.region
            ),
            Some(endpoint) => format!(
                "{}/{}/{encoded}",
                endpoint.origin().ascii_serialization(),
                self.bucket
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use aws_sdk_s3::config::Credentials;
    use axum::{
        Router,
        body::Bytes,
        extract::State,
        http::{HeaderMap, Uri},
        routing::put,
    };

    use super::*;

    fn config(endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            bucket: "serverlessignitecertificate".to_string(),
            region: "sa-east-1".to_string(),
            endpoint: endpoint.map(|e| Url::parse(e).unwrap()),
        }
    }

    async fn client(storage: &StorageConfig) -> S3Client {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("sa-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .load()
            .await;
        S3Client::new(&sdk_config, storage)
    }

    #[derive(Debug, Clone)]
    struct ReceivedPut {
        path: String,
        headers: HeaderMap,
        body: Bytes,
    }

    type Received = Arc<Mutex<Vec<ReceivedPut>>>;

    async fn record_put(
        State(received): State<Received>,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> &'static str {
        received.lock().unwrap().push(ReceivedPut {
            path: uri.path().to_owned(),
            headers,
            body,
        });
        ""
    }

    /// Local stand-in for an S3-compatible endpoint that accepts every PUT.
    async fn fake_store() -> (Url, Received) {
        let received = Received::default();
        let app = Router::new()
            .route("/{*path}", put(record_put))
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        (Url::parse(&format!("http://{addr}")).unwrap(), received)
    }

    #[tokio::test]
    async fn test_public_url_matches_legacy_pattern() {
        let client = client(&config(None)).await;
        assert_eq!(
            client.public_url("abc123.pdf"),
            "https://serverlessignitecertificate.s3-sa-east-1.amazonaws.com/abc123.pdf"
        );
    }

    #[tokio::test]
    async fn test_public_url_path_style_keeps_port() {
        let client = client(&config(Some("http://localhost:9000"))).await;
        assert_eq!(
            client.public_url("u1.pdf"),
            "http://localhost:9000/serverlessignitecertificate/u1.pdf"
        );
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("abc123.pdf"), "abc123.pdf");
        assert_eq!(encode_key("dir/test$file.text"), "dir/test%24file.text");
    }

    #[test]
    fn test_canned_acl_conversion() {
        assert_eq!(
            ObjectCannedAcl::from(ObjectAcl::PublicRead),
            ObjectCannedAcl::PublicRead
        );
        assert_eq!(
            ObjectCannedAcl::from(ObjectAcl::Private).as_str(),
            ObjectAcl::Private.as_str()
        );
    }

    #[tokio::test]
    async fn test_debug_lists_target() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("sa-east-1"))
            .build();
        let client = S3Client::new(&sdk_config, &config(None));

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("serverlessignitecertificate"));
        assert_eq!(client.bucket(), "serverlessignitecertificate");
    }

    #[tokio::test]
    async fn test_put_object_sends_public_pdf_path_style() {
        let (endpoint, received) = fake_store().await;
        let client = client(&config(Some(endpoint.as_str()))).await;

        client
            .put_object(PutObject::public_pdf("u1.pdf", b"%PDF-1.7 body".to_vec()))
            .await
            .unwrap();

        let received = received.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        let put = &received[0];
        assert_eq!(put.path, "/serverlessignitecertificate/u1.pdf");
        assert_eq!(put.headers["x-amz-acl"], "public-read");
        assert_eq!(put.headers["content-type"], "application/pdf");
        assert!(put.headers.contains_key("authorization"));
        assert!(put.body.windows(4).any(|w| w == b"%PDF"));
    }

    #[tokio::test]
    async fn test_put_object_reports_unreachable_store() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client(&config(Some(&format!("http://{addr}")))).await;

        let err = client
            .put_object(PutObject::public_pdf("u1.pdf", b"%PDF".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Upload { key, .. } if key == "u1.pdf"));
    }
}
