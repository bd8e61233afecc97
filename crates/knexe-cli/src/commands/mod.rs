//! Command handlers, one module per subcommand.

use std::time::Duration;

use knexe_adapters::NpmRegistryClient;
use tracing::debug;

use crate::config::AppConfig;

pub mod completions;
pub mod config;
pub mod init;
pub mod latest;
pub mod lib;

/// Registry client from the loaded config; `registry` (the `--registry` flag)
/// wins over `registry.url`.
pub(crate) fn registry_client(config: &AppConfig, registry: Option<&str>) -> NpmRegistryClient {
    let url = registry.unwrap_or(&config.registry.url);
    debug!(registry = url, "Using npm registry");

    let mut builder = NpmRegistryClient::builder()
        .base_url(url)
        .connect_timeout(Duration::from_secs(config.registry.connect_timeout_secs));
    if let Some(user_agent) = &config.registry.user_agent {
        builder = builder.user_agent(user_agent);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_configured_registry() {
        let mut config = AppConfig::default();
        config.registry.url = "http://configured:4873".into();

        assert_eq!(registry_client(&config, None).base_url(), "http://configured:4873");
        assert_eq!(
            registry_client(&config, Some("http://flag:4873/")).base_url(),
            "http://flag:4873"
        );
    }
}
