use anyhow::{Context, Result};

use super::RecordSource;

/// Reads the dataset from a file on disk.
pub struct LocalFileSource {
    path: String,
}

impl LocalFileSource {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for LocalFileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read '{}'", self.path))
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}
