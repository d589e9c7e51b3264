use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::{config::Region, error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;

/// [`ObjectStore`] backed by an S3-compatible bucket.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from explicit configuration. No ambient AWS profile or
    /// environment lookup happens here; credentials must be present in `config`.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let (Some(access_key_id), Some(secret_access_key)) = (config.access_key_id.as_deref(), config.secret_access_key.as_deref())
        else {
            return Err(StorageError::MissingCredentials);
        };

        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "previewd-config");

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint_url.as_str().trim_end_matches('/'))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::info!(
            endpoint = %config.endpoint_url,
            bucket = %config.bucket,
            "Configured S3 object store"
        );

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[tracing::instrument(skip(self, body), fields(bucket = %self.bucket, bytes = body.len()))]
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                source: DisplayErrorContext(e).to_string().into(),
            })?;

        tracing::debug!("Object written");
        Ok(())
    }
}
