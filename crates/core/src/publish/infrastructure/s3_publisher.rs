use std::path::Path;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use crate::publish::domain::publisher::{PublishError, Publisher};
use crate::shared::constants::OUTPUT_CONTENT_TYPE;

/// Uploads finished overlays to an S3 bucket as public-read GIFs.
#[derive(Clone, Debug)]
pub struct S3Publisher {
    client: Client,
    bucket: String,
    region: String,
}

impl S3Publisher {
    pub fn new(client: Client, bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            region: region.into(),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }
}

impl Publisher for S3Publisher {
    async fn publish(&self, file: &Path, key: &str) -> Result<String, PublishError> {
        let body = ByteStream::from_path(file)
            .await
            .map_err(|e| PublishError::Read {
                path: file.to_path_buf(),
                source: Box::new(e),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(OUTPUT_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| PublishError::Upload(DisplayErrorContext(e).to_string().into()))?;

        let url = self.object_url(key);
        log::info!("Uploaded {} to {url}", file.display());
        Ok(url)
    }
}

/// Virtual-hosted style URL of a public object.
fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
