use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::instrument;
use url::Url;

use crate::domain::{
    common::{ObjectStorageConfig, entities::app_errors::CoreError},
    storage::{entities::ObjectSummary, ports::ObjectStoragePort},
};

#[derive(Clone)]
pub struct MinioObjectStorage {
    client: Client,
    public_url: String,
}

impl MinioObjectStorage {
    pub fn new(config: &ObjectStorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "meallog",
        );

        let endpoint = config.endpoint.trim_end_matches('/');

        tracing::info!(
            endpoint = %endpoint,
            public_url = %config.public_url,
            region = %config.region,
            "Initializing MinIO client"
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            public_url: config.public_url.clone(),
        }
    }
}

/// `{public_url}/{bucket}/{key}`, keeping any path already on the public URL.
pub fn public_object_url(public_url: &str, bucket: &str, object_key: &str) -> Result<String, CoreError> {
    let mut url = Url::parse(public_url).map_err(|e| {
        tracing::error!(error = %e, public_url = %public_url, "Invalid public object storage URL");
        CoreError::InternalServerError
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            tracing::error!(public_url = %public_url, "Public object storage URL cannot be a base");
            CoreError::InternalServerError
        })?
        .pop_if_empty()
        .push(bucket)
        .extend(object_key.split('/'));

    Ok(url.to_string())
}

fn to_chrono(value: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

impl ObjectStoragePort for MinioObjectStorage {
    #[instrument(skip(self))]
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), CoreError> {
        if self.client.head_bucket().bucket(bucket).send().await.is_ok() {
            return Ok(());
        }

        tracing::info!(bucket = %bucket, "Bucket not found, creating it");

        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %bucket, "Failed to create bucket");
                CoreError::ObjectStorageError(format!("Failed to create bucket: {}", e))
            })?;

        Ok(())
    }

    #[instrument(skip(self, payload))]
    async fn put_object(
        &self,
        bucket: &str,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> Result<(), CoreError> {
        let payload_size = payload.len();

        tracing::info!(
            bucket = %bucket,
            object_key = %object_key,
            size = payload_size,
            content_type = %content_type,
            "Uploading object to storage"
        );

        self.client
            .put_object()
            .bucket(bucket)
            .key(object_key)
            .content_type(content_type)
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(|e| {
                let error_msg = format!("{}", e);
                let error_kind = if error_msg.contains("dispatch failure") {
                    "HTTP client dispatch failure - check endpoint URL and network connectivity"
                } else if error_msg.contains("timeout") {
                    "Request timeout - check network connection and MinIO server status"
                } else {
                    "Unknown error"
                };

                tracing::error!(
                    error = %e,
                    error_kind = %error_kind,
                    bucket = %bucket,
                    object_key = %object_key,
                    payload_size = payload_size,
                    "Failed to upload object"
                );
                CoreError::ObjectStorageError(format!(
                    "Failed to upload object: {} ({})",
                    e, error_kind
                ))
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, object_key: &str) -> Result<(), CoreError> {
        tracing::info!(
            bucket = %bucket,
            object_key = %object_key,
            "Deleting object from storage"
        );

        self.client
            .delete_object()
            .bucket(bucket)
            .key(object_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    object_key = %object_key,
                    "Failed to delete object"
                );
                CoreError::ObjectStorageError(format!("Failed to delete object: {}", e))
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, CoreError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, bucket = %bucket, prefix = %prefix, "Failed to list objects");
                    CoreError::ObjectStorageError(format!("Failed to list objects: {}", e))
                })?;

            objects.extend(page.contents().iter().filter_map(|object| {
                Some(ObjectSummary {
                    object_key: object.key()?.to_string(),
                    size_bytes: object.size().unwrap_or_default(),
                    last_modified: object.last_modified().and_then(to_chrono),
                })
            }));

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(objects)
    }

    fn object_url(&self, bucket: &str, object_key: &str) -> Result<String, CoreError> {
        public_object_url(&self.public_url, bucket, object_key)
    }
}
