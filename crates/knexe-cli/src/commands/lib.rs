//! Implementation of the `knexe lib` command.
//!
//! Responsibility: translate CLI arguments into [`LibraryOptions`], wire the
//! adapters, run the generator, and commit or preview its changes. No
//! business logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument};

use knexe_adapters::{
    JsonFormatter, LocalFilesystem, MemoryTree, MinimalLibraryGenerator, ProjectJsonRegistry,
    SimpleRenderer, default_store,
};
use knexe_core::{
    application::{LibraryGenerator, Tree, WorkspaceService, ports::Filesystem},
    domain::{ChangeKind, ChangeSet, LibraryIdentity, LibraryOptions},
    error::{Context, KnexeError},
};

use crate::{
    cli::{LibArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `knexe lib` command.
///
/// Dispatch sequence:
/// 1. Resolve the workspace root and the library identity
/// 2. Run the generator against a buffered tree
/// 3. Early-exit with a listing if `--dry-run`
/// 4. Commit the changes, then run the install task
#[instrument(skip_all, fields(library = %args.name))]
pub async fn execute(
    args: LibArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Workspace + identity
    let workspace = resolve_workspace(args.workspace.as_deref(), &config)?;
    let scope = config.scope()?;
    let options = LibraryOptions::new(args.name.as_str())
        .directory(args.directory.clone().unwrap_or_default())
        .publishable(args.publishable);
    let identity = LibraryIdentity::resolve(&options, &scope).map_err(KnexeError::from)?;
    debug!(
        workspace = %workspace.display(),
        root = %identity.root,
        package = %identity.package_name,
        "Library resolved"
    );

    // 2. Generate
    let resolver = Arc::new(super::registry_client(&config, args.registry.as_deref()));
    let base = MinimalLibraryGenerator::new(Box::new(ProjectJsonRegistry::new()))
        .skip_install(args.skip_install || args.dry_run);
    let generator = LibraryGenerator::new(
        Box::new(base),
        Box::new(ProjectJsonRegistry::new()),
        resolver,
        default_store(),
        Box::new(SimpleRenderer::new()),
        Box::new(JsonFormatter::new()),
    )
    .with_scope(scope)
    .with_clean_target(!args.no_clean);

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let mut tree = MemoryTree::new(workspace.clone(), filesystem);

    output.header(&format!("Generating '{}'...", identity.package_name))?;
    let spinner = output.spinner("Resolving dev dependency versions...");
    let generated = generator.generate(&mut tree, &options).await;
    spinner.finish_and_clear();
    let task = generated?;
    let changes = tree.changes();

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        report(&output, &identity, &changes, true)?;
        output.warning("Dry run: no files were written")?;
        return Ok(());
    }

    // 4. Commit + deferred work
    let committed = WorkspaceService::new(Box::new(LocalFilesystem::new()), workspace.clone())
        .commit(&changes)?;
    info!(files = committed.total(), root = %identity.root, "Library written");
    report(&output, &identity, &changes, false)?;

    if !task.is_noop() {
        output.info(&format!("Running {}...", task.label()))?;
        tokio::task::spawn_blocking(move || task.run())
            .await
            .context("deferred task did not complete")??;
    }

    output.success(&format!(
        "Library '{}' created in {}",
        identity.package_name, identity.root
    ))?;
    if !global.quiet && output.format() != OutputFormat::Json {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", identity.root))?;
        output.print(&format!("  edit src/lib/{}.ts", identity.file_name))?;
    }

    Ok(())
}

// ── Workspace resolution ──────────────────────────────────────────────────────

/// `--workspace`, then `generator.workspace_root`, then the current directory.
fn resolve_workspace(flag: Option<&Path>, config: &AppConfig) -> CliResult<PathBuf> {
    let workspace = match flag.or(config.generator.workspace_root.as_deref()) {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !workspace.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("workspace '{}' is not a directory", workspace.display()),
        });
    }
    Ok(workspace)
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn action(kind: &ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Create(_) => "CREATE",
        ChangeKind::Update(_) => "UPDATE",
        ChangeKind::Delete => "DELETE",
    }
}

fn report(
    output: &OutputManager,
    identity: &LibraryIdentity,
    changes: &ChangeSet,
    dry_run: bool,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let files: Vec<_> = changes
            .iter()
            .map(|c| json!({ "action": action(&c.kind), "path": c.path.as_str() }))
            .collect();
        output.json(&json!({
            "package": identity.package_name.to_string(),
            "root": identity.root.as_str(),
            "dryRun": dry_run,
            "files": files,
        }))?;
        return Ok(());
    }

    for change in changes.iter() {
        output.file_action(action(&change.kind), change.path.as_str())?;
    }
    Ok(())
}
