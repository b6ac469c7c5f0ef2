//! Favicon fetching with a body size cap

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub(crate) enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

pub(crate) struct FaviconFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl FaviconFetcher {
    pub(crate) fn new(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    /// GET `url` and return the raw body of a `200 OK` response.
    ///
    /// Any other status, other 2xx codes included, counts as no favicon.
    ///
    /// The body is streamed and abandoned as soon as it exceeds the cap.
    /// An empty body is a valid favicon as far as hashing is concerned.
    #[instrument(skip(self))]
    pub(crate) async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(FetchError::TooLarge {
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut stream = response.bytes_stream();
        let mut buf = Vec::with_capacity(self.max_body_bytes.min(16 * 1024));

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > self.max_body_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_body_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        debug!(bytes = buf.len(), "Favicon fetched");
        Ok(buf)
    }
}
