//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "knexe",
    bin_name = "knexe",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Knexe library generator",
    long_about = "knexe scaffolds TypeScript libraries into the Knexe monorepo \
                  with tsdown, pinned dev dependencies and the workspace \
                  build targets.",
    after_help = "EXAMPLES:\n\
        \x20 knexe lib widgets\n\
        \x20 knexe lib data-utils --directory packages/shared/data-utils --publishable\n\
        \x20 knexe latest tsdown @types/node\n\
        \x20 knexe completions bash > /usr/share/bash-completion/completions/knexe",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new library.
    #[command(
        visible_alias = "library",
        about = "Generate a TypeScript library",
        after_help = "EXAMPLES:\n\
            \x20 knexe lib widgets\n\
            \x20 knexe lib widgets --publishable --skip-install\n\
            \x20 knexe lib widgets --directory libs/ui/widgets --dry-run"
    )]
    Lib(LibArgs),

    /// Look up the latest published version of packages.
    #[command(
        about = "Show the latest version of npm packages",
        after_help = "EXAMPLES:\n\
            \x20 knexe latest tsdown\n\
            \x20 knexe latest tsdown @types/node rimraf --output-format json"
    )]
    Latest(LatestArgs),

    /// Initialise a knexe configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 knexe init           # user configuration directory\n\
            \x20 knexe init --local   # .knexe.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 knexe completions bash > ~/.local/share/bash-completion/completions/knexe\n\
            \x20 knexe completions zsh  > ~/.zfunc/_knexe\n\
            \x20 knexe completions fish > ~/.config/fish/completions/knexe.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the knexe configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 knexe config get registry.url\n\
            \x20 knexe config list\n\
            \x20 knexe config path"
    )]
    Config(ConfigCommands),
}

// ── lib ───────────────────────────────────────────────────────────────────────

/// Arguments for `knexe lib`.
#[derive(Debug, Args)]
pub struct LibArgs {
    /// Library name; also the unscoped npm package name.
    #[arg(value_name = "NAME", help = "Library name")]
    pub name: String,

    /// Workspace-relative directory; defaults to the kebab-case name.
    #[arg(
        short = 'd',
        long = "directory",
        value_name = "DIR",
        help = "Directory of the library, relative to the workspace root"
    )]
    pub directory: Option<String>,

    /// Make the package publicly publishable.
    #[arg(long = "publishable", help = "Generate a publishable (public) package")]
    pub publishable: bool,

    /// Show what would be written without touching the workspace.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Do not install packages after generation.
    #[arg(long = "skip-install", help = "Skip installing packages")]
    pub skip_install: bool,

    /// Do not register the `clean` target.
    #[arg(long = "no-clean", help = "Skip the clean target")]
    pub no_clean: bool,

    /// Override the npm registry.
    #[arg(
        long = "registry",
        value_name = "URL",
        help = "npm registry to resolve dev dependency versions from"
    )]
    pub registry: Option<String>,

    /// Workspace root; defaults to the configured root or the current directory.
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "DIR",
        help = "Workspace root directory"
    )]
    pub workspace: Option<PathBuf>,
}

// ── latest ────────────────────────────────────────────────────────────────────

/// Arguments for `knexe latest`.
#[derive(Debug, Args)]
pub struct LatestArgs {
    /// Package names, scoped or not.
    #[arg(value_name = "PACKAGE", required = true, num_args = 1.., help = "Package names")]
    pub packages: Vec<String>,

    /// Override the npm registry.
    #[arg(long = "registry", value_name = "URL", help = "npm registry to query")]
    pub registry: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `knexe init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.knexe.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `knexe completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `knexe config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `registry.url`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
