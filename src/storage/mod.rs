//! Where the collision CSV comes from.
//!
//! [`RecordSource`] is the async trait for fetching the raw dataset bytes.
//! [`S3Source`] reads an object from S3, [`LocalFileSource`] reads a file
//! and [`HttpSource`] downloads a URL. [`load_dataset`] turns any of them
//! into a cleaned [`Dataset`].

mod http;
mod local;
mod s3;

pub use http::HttpSource;
pub use local::LocalFileSource;
pub use s3::{S3Source, s3_client, write_json_to_s3};

use anyhow::{Context, Result, bail};
use std::fmt;
use tracing::info;

use crate::dataset::Dataset;
use crate::parser::{decompress_if_gzipped, parse_rows};

/// Fetches the raw (possibly gzip-compressed) CSV payload.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, also used to detect a `.gz` payload.
    fn describe(&self) -> String;
}

/// A parsed dataset location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    S3 { bucket: String, key: String },
    Http(String),
    File(String),
}

impl SourceLocation {
    /// Accepts `s3://bucket/key`, `http(s)://...`, or a filesystem path.
    pub fn parse(location: &str) -> Result<Self> {
        if let Some(rest) = location.strip_prefix("s3://") {
            let Some((bucket, key)) = rest.split_once('/') else {
                bail!("S3 location '{location}' must look like s3://bucket/key");
            };
            if bucket.is_empty() || key.is_empty() {
                bail!("S3 location '{location}' must look like s3://bucket/key");
            }
            return Ok(SourceLocation::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(SourceLocation::Http(location.to_string()));
        }

        Ok(SourceLocation::File(location.to_string()))
    }

    pub fn s3(bucket: &str, key: &str) -> Self {
        SourceLocation::S3 {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            SourceLocation::Http(url) => f.write_str(url),
            SourceLocation::File(path) => f.write_str(path),
        }
    }
}

/// Builds the source for `location`. S3 sources load the AWS configuration
/// from the environment, pinned to `region` when one is given.
pub async fn source_for(
    location: &SourceLocation,
    region: Option<&str>,
) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match location {
        SourceLocation::S3 { bucket, key } => {
            Box::new(S3Source::from_env(bucket, key, region).await)
        }
        SourceLocation::Http(url) => Box::new(HttpSource::new(url)?),
        SourceLocation::File(path) => Box::new(LocalFileSource::new(path)),
    };
    Ok(source)
}

/// Fetches, decodes and cleans the dataset. Any failure here is fatal for
/// the caller; there is nothing to serve without data.
#[tracing::instrument(skip(source), fields(location = %source.describe()))]
pub async fn load_dataset(source: &dyn RecordSource) -> Result<Dataset> {
    let name = source.describe();

    let bytes = source
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch dataset from {name}"))?;
    info!(bytes = bytes.len(), "Dataset payload fetched");

    let bytes = decompress_if_gzipped(&name, bytes)?;
    let rows = parse_rows(&bytes).with_context(|| format!("Failed to parse dataset from {name}"))?;

    Ok(Dataset::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InMemory(&'static str);

    #[async_trait::async_trait]
    impl RecordSource for InMemory {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }

        fn describe(&self) -> String {
            "memory.csv".to_string()
        }
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl RecordSource for Unreachable {
        async fn fetch(&self) -> Result<Vec<u8>> {
            bail!("connection refused")
        }

        fn describe(&self) -> String {
            "s3://nowhere/data.csv".to_string()
        }
    }

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            SourceLocation::parse("s3://comp449-heatmap-hfd/HFD_22_Final_index.csv").unwrap(),
            SourceLocation::s3("comp449-heatmap-hfd", "HFD_22_Final_index.csv")
        );
        assert_eq!(
            SourceLocation::parse("s3://bucket/nested/path.csv.gz").unwrap(),
            SourceLocation::s3("bucket", "nested/path.csv.gz")
        );
        assert_eq!(
            SourceLocation::parse("https://example.com/crashes.csv").unwrap(),
            SourceLocation::Http("https://example.com/crashes.csv".into())
        );
        assert_eq!(
            SourceLocation::parse("data/crashes.csv").unwrap(),
            SourceLocation::File("data/crashes.csv".into())
        );
    }

    #[test]
    fn test_malformed_s3_location() {
        assert!(SourceLocation::parse("s3://bucket").is_err());
        assert!(SourceLocation::parse("s3:///key").is_err());
        assert!(SourceLocation::parse("s3://bucket/").is_err());
    }

    #[test]
    fn test_location_display_roundtrip() {
        let loc = SourceLocation::s3("b", "k.csv");
        assert_eq!(SourceLocation::parse(&loc.to_string()).unwrap(), loc);
    }

    #[tokio::test]
    async fn test_load_dataset_from_source() {
        let source = InMemory("Latitude,Longitude,bottleneck_values\n1.0,2.0,3\n,2.0,4\n");
        let ds = load_dataset(&source).await.unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_an_error() {
        let err = load_dataset(&Unreachable).await.unwrap_err();
        assert!(err.to_string().contains("s3://nowhere/data.csv"));
    }
}
