//! Environment-driven settings.
//!
//! Values are read after `dotenvy` has loaded any `.env` file, so either
//! source works. Command-line flags take precedence over what is here.

use crate::storage::SourceLocation;

pub const DEFAULT_BUCKET: &str = "comp449-heatmap-hfd";
pub const DEFAULT_KEY: &str = "HFD_22_Final_index.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/collision_heatmap.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `DATA_BUCKET`
    pub data_bucket: String,
    /// `DATA_KEY`
    pub data_key: String,
    /// `REGION`; when unset the AWS provider chain decides.
    pub region: Option<String>,
    /// `LOG_FILE_PATH`
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            data_bucket: get("DATA_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            data_key: get("DATA_KEY").unwrap_or_else(|| DEFAULT_KEY.to_string()),
            region: get("REGION"),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        }
    }

    /// The S3 object named by `DATA_BUCKET` / `DATA_KEY`.
    pub fn default_location(&self) -> SourceLocation {
        SourceLocation::s3(&self.data_bucket, &self.data_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_bucket, DEFAULT_BUCKET);
        assert_eq!(config.data_key, DEFAULT_KEY);
        assert_eq!(config.region, None);
        assert_eq!(config.log_file_path, DEFAULT_LOG_FILE);
        assert_eq!(
            config.default_location().to_string(),
            "s3://comp449-heatmap-hfd/HFD_22_Final_index.csv"
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATA_BUCKET", "crashes"),
            ("DATA_KEY", "2023/all.csv.gz"),
            ("REGION", "us-east-2"),
            ("LOG_FILE_PATH", "/var/log/heatmap.log"),
        ]);
        assert_eq!(config.region.as_deref(), Some("us-east-2"));
        assert_eq!(
            config.default_location(),
            SourceLocation::s3("crashes", "2023/all.csv.gz")
        );
        assert_eq!(config.log_file_path, "/var/log/heatmap.log");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("DATA_BUCKET", "  "), ("REGION", "")]);
        assert_eq!(config.data_bucket, DEFAULT_BUCKET);
        assert_eq!(config.region, None);
    }
}
