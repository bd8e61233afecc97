//! Version Service - latest-version lookups.
//!
//! Thin orchestration over the [`VersionResolver`] port. Lookups for several
//! packages run concurrently and come back in the order they were asked for.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, instrument};

use crate::{
    application::{RegistryError, ports::VersionResolver},
    domain::VersionRecord,
    error::{KnexeError, KnexeResult},
};

/// Service for registry version queries.
#[derive(Clone)]
pub struct VersionService {
    resolver: Arc<dyn VersionResolver>,
}

impl VersionService {
    pub fn new(resolver: Arc<dyn VersionResolver>) -> Self {
        Self { resolver }
    }

    /// Latest version of a single package.
    #[instrument(skip(self))]
    pub async fn resolve(&self, package: &str) -> KnexeResult<VersionRecord> {
        if package.trim().is_empty() {
            return Err(RegistryError::InvalidPackageName {
                package: package.into(),
            }
            .into());
        }
        let version = self.resolver.resolve_latest(package).await?;
        debug!(%package, %version, "Resolved latest version");
        Ok(VersionRecord::new(package, version))
    }

    /// Latest versions of several packages, looked up concurrently.
    ///
    /// Results keep the input order. The first failure is returned and the
    /// remaining lookups are aborted.
    #[instrument(skip_all, fields(count = packages.len()))]
    pub async fn resolve_many(&self, packages: &[String]) -> KnexeResult<Vec<VersionRecord>> {
        let mut set = JoinSet::new();
        for (index, package) in packages.iter().cloned().enumerate() {
            let service = self.clone();
            set.spawn(async move { (index, service.resolve(&package).await) });
        }

        let mut slots: Vec<Option<VersionRecord>> = vec![None; packages.len()];
        while let Some(joined) = set.join_next().await {
            let (index, result) = joined.map_err(|e| KnexeError::Internal {
                message: format!("version lookup task failed: {e}"),
            })?;
            slots[index] = Some(result?);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
