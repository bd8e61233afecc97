//! `knexe latest` - print the latest published version of packages.

use std::sync::Arc;

use tracing::instrument;

use knexe_core::application::VersionService;

use crate::{
    cli::{LatestArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Resolve every package concurrently and print `name@version` lines (or a
/// JSON array), in the order given.
#[instrument(skip_all, fields(packages = args.packages.len()))]
pub async fn execute(args: LatestArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let resolver = Arc::new(super::registry_client(&config, args.registry.as_deref()));
    let service = VersionService::new(resolver);

    let spinner = output.spinner(format!("Querying {} package(s)...", args.packages.len()));
    let resolved = service.resolve_many(&args.packages).await;
    spinner.finish_and_clear();
    let records = resolved?;

    if output.format() == OutputFormat::Json {
        output.json(&records)?;
    } else {
        for record in &records {
            output.data(&record.to_string())?;
        }
    }
    Ok(())
}
