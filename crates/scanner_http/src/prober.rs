// crates/scanner_http/src/prober.rs
//! HTTP favicon prober implementation

use async_trait::async_trait;
use reqwest::Client;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, instrument};

use favscan_common::{FavscanResult, ProbeOptions, ProbeResult, Prober};
use favscan_fingerprint::SignatureStore;

use crate::fetch::FaviconFetcher;

/// Fetches `http://<address>/favicon.ico` and matches its digest.
pub struct HttpProber {
    fetcher: FaviconFetcher,
    store: Arc<SignatureStore>,
    options: ProbeOptions,
}

impl HttpProber {
    /// Create a prober with default options.
    pub fn new(store: Arc<SignatureStore>) -> FavscanResult<Self> {
        Self::with_options(store, ProbeOptions::default())
    }

    /// Build the shared HTTP client for `options`.
    ///
    /// Certificates are not verified and no proxy is used: probes go
    /// straight to the device.
    pub fn with_options(store: Arc<SignatureStore>, options: ProbeOptions) -> FavscanResult<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self {
            fetcher: FaviconFetcher::new(client, options.max_body_bytes),
            store,
            options,
        })
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }
}

#[async_trait]
impl Prober for HttpProber {
    #[instrument(skip(self))]
    async fn probe(&self, address: IpAddr) -> Option<ProbeResult> {
        let url = self.options.url_for(address);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                debug!(%address, %url, "Favicon unavailable: {}", e);
                return None;
            }
        };

        let matches = self.store.identify(&body);
        if matches.is_empty() {
            debug!(%address, "No signature matched the favicon");
            return None;
        }

        let result = ProbeResult::new(address, matches);
        debug!(%result, "Favicon identified");
        Some(result)
    }

    fn name(&self) -> &str {
        "HTTP Favicon Prober"
    }
}
