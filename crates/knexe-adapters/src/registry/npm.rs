//! npm registry client.
//!
//! One lookup is one `GET <registry>/<encoded-name>/latest`. The package name
//! is encoded as a single path segment, so `@scope/pkg` is requested as
//! `%40scope%2Fpkg`.

use std::time::Duration;

use async_trait::async_trait;
use knexe_core::application::{RegistryError, ports::VersionResolver};
use serde_json::Value;
use tracing::{debug, instrument};
use url::{Url, form_urlencoded};

/// The public npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

const DEFAULT_USER_AGENT: &str = concat!("knexe/", env!("CARGO_PKG_VERSION"));
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`VersionResolver`] backed by an npm-compatible HTTP registry.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct NpmRegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl NpmRegistryClient {
    /// Client for the public registry with default settings.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> NpmRegistryClientBuilder {
        NpmRegistryClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for NpmRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`NpmRegistryClient`].
#[derive(Debug, Clone)]
pub struct NpmRegistryClientBuilder {
    base_url: String,
    user_agent: String,
    connect_timeout: Duration,
}

impl Default for NpmRegistryClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl NpmRegistryClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> NpmRegistryClient {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .connect_timeout(self.connect_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        NpmRegistryClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

/// URL of the `latest` dist-tag document for `package`.
pub fn latest_url(base_url: &str, package: &str) -> Result<Url, RegistryError> {
    if package.trim().is_empty() {
        return Err(RegistryError::InvalidPackageName {
            package: package.into(),
        });
    }

    let encoded: String = form_urlencoded::byte_serialize(package.as_bytes()).collect();
    let raw = format!("{}/{}/latest", base_url.trim_end_matches('/'), encoded);
    Url::parse(&raw).map_err(|e| RegistryError::network(package, e))
}

/// Interpret a registry answer.
///
/// Only a 200 carrying a JSON object with a string `version` is a success.
pub fn parse_latest_response(
    package: &str,
    status: u16,
    body: &[u8],
) -> Result<String, RegistryError> {
    if status != 200 {
        return Err(RegistryError::Lookup {
            package: package.into(),
            status,
        });
    }

    let json: Value =
        serde_json::from_slice(body).map_err(|e| RegistryError::MalformedResponse {
            package: package.into(),
            reason: e.to_string(),
        })?;

    json.get("version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RegistryError::MissingVersionField {
            package: package.into(),
        })
}

#[async_trait]
impl VersionResolver for NpmRegistryClient {
    #[instrument(skip(self), fields(registry = %self.base_url))]
    async fn resolve_latest(&self, package: &str) -> Result<String, RegistryError> {
        let url = latest_url(&self.base_url, package)?;
        debug!(%url, "Requesting latest version");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::network(package, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            // Drain so the connection can be reused; the status alone decides.
            if let Err(e) = response.bytes().await {
                debug!(status, error = %e, "Discarding unreadable error body");
            }
            return Err(RegistryError::Lookup {
                package: package.into(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::network(package, e))?;
        debug!(status, bytes = body.len(), "Registry answered");

        parse_latest_response(package, status, &body)
    }
}
