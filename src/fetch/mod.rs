//! HTTP transport used when the dataset is served from a plain URL.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails, or the server
/// answers with a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid URL '{url}'"))?,
    );

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("Request to '{url}' failed"))?
        .error_for_status()?;

    Ok(resp.bytes().await?.to_vec())
}
