use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use serde::Serialize;

use super::RecordSource;

/// Reads the dataset from a single S3 object.
///
/// Credentials come from the standard AWS provider chain
/// (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`, profiles, instance
/// roles).
pub struct S3Source {
    client: aws_sdk_s3::Client,
    bucket: String,
    key: String,
}

impl S3Source {
    pub fn new(client: aws_sdk_s3::Client, bucket: &str, key: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    /// Loads AWS configuration from the environment and builds a client.
    /// `region` overrides whatever region the provider chain resolves.
    pub async fn from_env(bucket: &str, key: &str, region: Option<&str>) -> Self {
        Self::new(s3_client(region).await, bucket, key)
    }
}

/// Builds an S3 client from the ambient AWS configuration.
pub async fn s3_client(region: Option<&str>) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let config = loader.load().await;
    aws_sdk_s3::Client::new(&config)
}

#[async_trait::async_trait]
impl RecordSource for S3Source {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .with_context(|| format!("S3 GetObject failed for '{}'", self.describe()))?;

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read S3 object body for '{}'", self.describe()))?;

        Ok(body.into_bytes().to_vec())
    }

    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> Result<()> {
    let body = serde_json::to_vec(value)?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json")
        .send()
        .await
        .with_context(|| format!("S3 PutObject failed for 's3://{bucket}/{key}'"))?;

    Ok(())
}
