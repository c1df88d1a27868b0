use crate::error::PipelineError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// Retrieval of raw bytes from the remote file-hosting endpoint.
///
/// One call, no retries: a single transient network failure is surfaced to
/// the caller, not hidden.
#[async_trait::async_trait]
pub trait FileFetch: Send + Sync {
    async fn fetch(&self, file_path: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Fetches files over HTTP from `<api_base>/file/bot<TOKEN>/<file_path>`.
pub struct HttpFileFetcher {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl HttpFileFetcher {
    pub fn new(api_base: &str, token: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }
}

#[async_trait::async_trait]
impl FileFetch for HttpFileFetcher {
    async fn fetch(&self, file_path: &str) -> Result<Vec<u8>, PipelineError> {
        let url = self.file_url(file_path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::TransportFetch(format!(
                "unexpected HTTP status {} for {}",
                status, file_path
            )));
        }

        let bytes = response.bytes().await?;
        info!("Fetched {} bytes for {}", bytes.len(), file_path);

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_format() {
        let fetcher = HttpFileFetcher::new(
            "https://api.telegram.org",
            "123:abc".to_string(),
            Duration::from_secs(30),
        )
        .unwrap();

        assert_eq!(
            fetcher.file_url("photos/file_1.jpg"),
            "https://api.telegram.org/file/bot123:abc/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_file_url_strips_trailing_slash() {
        let fetcher = HttpFileFetcher::new(
            "http://localhost:8081/",
            "t".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            fetcher.file_url("voice/file_2.oga"),
            "http://localhost:8081/file/bott/voice/file_2.oga"
        );
    }
}
