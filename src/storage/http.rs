use anyhow::Result;

use super::RecordSource;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

/// Downloads the dataset from an HTTP(S) URL.
pub struct HttpSource<C = BasicClient> {
    client: C,
    url: String,
}

impl HttpSource<BasicClient> {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self::with_client(BasicClient::new()?, url))
    }
}

impl<C: HttpClient> HttpSource<C> {
    pub fn with_client(client: C, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl<C: HttpClient> RecordSource for HttpSource<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<u8>> {
        fetch_bytes(&self.client, &self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
