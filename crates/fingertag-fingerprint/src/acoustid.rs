// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::models::{LookupResponse, LookupResult};
use crate::service::LookupService;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, trace};
use url::Url;

const ACOUSTID_API_BASE: &str = "https://api.acoustid.org/v2";
const LOOKUP_META: &str = "recordings releasegroups sources compress";
const USER_AGENT: &str = concat!("fingertag/", env!("CARGO_PKG_VERSION"));

/// AcoustID API client for fingerprint lookup.
#[derive(Debug, Clone)]
pub struct AcoustidClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AcoustidClient {
    /// Create a new AcoustID client.
    ///
    /// # Arguments
    /// * `api_key` - AcoustID application key sent as `client`.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(api_key: impl Into<String>) -> AcoustidClientBuilder {
        AcoustidClientBuilder::new(api_key)
    }

    /// Lookup a fingerprint and return every result with its recordings and
    /// release groups.
    ///
    /// The request is a form-encoded POST because fingerprints of long tracks
    /// do not fit comfortably in a query string.
    ///
    /// # Errors
    /// - `LookupFailed` if the service answers with a non-2xx status or with
    ///   a status other than `"ok"`.
    /// - `RequestFailed` if the call cannot complete.
    ///
    /// # Example
    /// ```no_run
    /// # use fingertag_fingerprint::{AcoustidClient, Fingerprint};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AcoustidClient::new("your-api-key")?;
    /// let fp = Fingerprint::new("AQADvEWZ", 205);
    /// let response = client.lookup(&fp).await?;
    /// println!("{} results", response.results.len());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(duration = fingerprint.duration))]
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<LookupResponse> {
        fingerprint.validate()?;

        let url = Url::parse(&format!("{}/lookup", self.base_url))
            .map_err(|e| crate::FingerprintError::InvalidResponse(e.to_string()))?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client", &self.api_key)
            .append_pair("duration", &fingerprint.duration.to_string())
            .append_pair("meta", LOOKUP_META)
            .append_pair("fingerprint", &fingerprint.hash)
            .finish();

        trace!(target: "fingerprint", "AcoustID lookup: {}", url);

        let response = self
            .client
            .post(url.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "fingerprint", "AcoustID response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(crate::FingerprintError::LookupFailed(format!(
                "HTTP {}: {}",
                status, message
            )));
        }

        let body = response.text().await?;
        trace!(target: "fingerprint", "AcoustID response: {}", body);

        let api_response: AcoustidResponse = serde_json::from_str(&body)?;

        if !api_response.status.eq_ignore_ascii_case("ok") {
            return Err(crate::FingerprintError::LookupFailed(
                api_response
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!(
            target: "fingerprint",
            results = api_response.results.len(),
            "AcoustID lookup complete"
        );

        Ok(LookupResponse {
            results: api_response.results,
        })
    }
}

#[async_trait::async_trait]
impl LookupService for AcoustidClient {
    async fn lookup(&self, fingerprint: &Fingerprint) -> Result<LookupResponse> {
        AcoustidClient::lookup(self, fingerprint).await
    }
}

/// AcoustID API response envelope.
#[derive(Debug, Deserialize)]
struct AcoustidResponse {
    status: String,
    #[serde(default)]
    results: Vec<LookupResult>,
    error: Option<AcoustidErrorBody>,
}

#[derive(Debug, Deserialize)]
struct AcoustidErrorBody {
    message: String,
}

/// Builder for AcoustID client.
#[derive(Debug)]
pub struct AcoustidClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl AcoustidClientBuilder {
    /// Create a new builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ACOUSTID_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom base URL (useful for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the AcoustID client.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The API key is empty
    /// - The base URL is not a valid URL format
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<AcoustidClient> {
        if self.api_key.trim().is_empty() {
            return Err(crate::FingerprintError::LookupFailed(
                "AcoustID API key is empty".to_string(),
            ));
        }

        Url::parse(&self.base_url).map_err(|e| {
            crate::FingerprintError::LookupFailed(format!("Invalid base URL: {}", e))
        })?;

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(AcoustidClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
        })
    }
}
