use std::future::Future;

use bytes::Bytes;

use crate::domain::common::entities::app_errors::CoreError;

use super::entities::ObjectSummary;

/// Port for object storage operations (MinIO/S3)
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStoragePort: Send + Sync {
    /// Create the bucket when it does not exist yet
    fn ensure_bucket(&self, bucket: &str) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Upload an object directly to storage
    fn put_object(
        &self,
        bucket: &str,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Delete an object from storage
    fn delete_object(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// List objects whose key starts with `prefix`
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<ObjectSummary>, CoreError>> + Send;

    /// Public URL of an object
    fn object_url(&self, bucket: &str, object_key: &str) -> Result<String, CoreError>;
}
