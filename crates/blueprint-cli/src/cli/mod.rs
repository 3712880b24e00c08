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
    name    = "blueprint",
    bin_name = "blueprint",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Application model to DSL conversion and workspace export",
    long_about = "Blueprint turns application configurations (options plus an \
                  entity graph) into DSL text, and exports several related \
                  applications into a multi-service workspace.",
    after_help = "EXAMPLES:\n\
        \x20 blueprint dsl store.json\n\
        \x20 blueprint dsl apps/ --deployment kubernetes\n\
        \x20 blueprint export apps.json --communications comms.json --output ./workspace\n\
        \x20 blueprint deployment openshift --full",
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
    /// Print applications as DSL text.
    #[command(
        about = "Convert application configurations to DSL",
        after_help = "EXAMPLES:\n\
            \x20 blueprint dsl store.json\n\
            \x20 blueprint dsl apps/ --deployment minikube\n\
            \x20 blueprint --output-format json dsl store.toml"
    )]
    Dsl(DslArgs),

    /// Export applications into a workspace.
    #[command(
        visible_alias = "x",
        about = "Export applications into a workspace directory",
        after_help = "EXAMPLES:\n\
            \x20 blueprint export apps.json --output ./workspace\n\
            \x20 blueprint export apps/ --communications comms.json\n\
            \x20 blueprint export store.json --single"
    )]
    Export(ExportArgs),

    /// Show the default options of a deployment topology.
    #[command(
        visible_alias = "deploy",
        about = "Print deployment defaults as JSON",
        after_help = "EXAMPLES:\n\
            \x20 blueprint deployment kubernetes\n\
            \x20 blueprint deployment openshift --full\n\
            \x20 blueprint deployment k8s --strict"
    )]
    Deployment(DeploymentArgs),

    /// Initialise a Blueprint configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 blueprint init           # global config\n\
            \x20 blueprint init --local   # .blueprint.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 blueprint completions bash > ~/.local/share/bash-completion/completions/blueprint\n\
            \x20 blueprint completions zsh  > ~/.zfunc/_blueprint\n\
            \x20 blueprint completions fish > ~/.config/fish/completions/blueprint.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Blueprint configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 blueprint config get defaults.deployment\n\
            \x20 blueprint config list\n\
            \x20 blueprint config path"
    )]
    Config(ConfigCommands),
}

// ── dsl ───────────────────────────────────────────────────────────────────────

/// Arguments for `blueprint dsl`.
#[derive(Debug, Args)]
pub struct DslArgs {
    /// JSON/TOML file, or a directory of them.
    #[arg(value_name = "INPUT", help = "Application config file or directory")]
    pub input: PathBuf,

    /// Merge this topology's defaults before converting.
    #[arg(
        short = 'd',
        long = "deployment",
        value_name = "TOPOLOGY",
        help = "Deployment topology (dockerCompose, kubernetes, openshift, minikube)"
    )]
    pub deployment: Option<String>,

    #[arg(
        long = "skip-user-management",
        help = "Treat relationships to User as errors instead of built-in references"
    )]
    pub skip_user_management: bool,
}

// ── export ────────────────────────────────────────────────────────────────────

/// Arguments for `blueprint export`.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// JSON/TOML file, or a directory of them.
    #[arg(value_name = "INPUT", help = "Application config file or directory")]
    pub input: PathBuf,

    /// Communication links between applications.
    #[arg(
        long = "communications",
        value_name = "FILE",
        help = "Communications file (client/server/broker links)"
    )]
    pub communications: Option<PathBuf>,

    /// Workspace root; created if missing.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Write one application as a standalone file instead of a workspace.
    #[arg(long = "single", help = "Export exactly one application as a single file")]
    pub single: bool,

    /// Merge this topology's defaults before exporting.
    #[arg(
        short = 'd',
        long = "deployment",
        value_name = "TOPOLOGY",
        help = "Deployment topology whose defaults are merged in"
    )]
    pub deployment: Option<String>,
}

// ── deployment ────────────────────────────────────────────────────────────────

/// Arguments for `blueprint deployment`.
#[derive(Debug, Args)]
pub struct DeploymentArgs {
    /// Topology tag; unknown tags fall back to dockerCompose unless `--strict`.
    #[arg(value_name = "TOPOLOGY", help = "Deployment topology tag")]
    pub tag: String,

    #[arg(long = "strict", help = "Fail on unknown topology tags")]
    pub strict: bool,

    /// Include the registry and folder keys of a full deployment record.
    #[arg(long = "full", help = "Print the full deployment record")]
    pub full: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `blueprint init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(
        long = "global",
        conflicts_with = "local",
        help = "Create global configuration (default)"
    )]
    pub global: bool,

    /// Write to `.blueprint.toml` in the current directory.
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

/// Arguments for `blueprint completions`.
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

/// Subcommands for `blueprint config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.deployment`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_dsl_command() {
        let cli = Cli::parse_from(["blueprint", "dsl", "store.json", "-d", "k8s"]);
        let Commands::Dsl(args) = cli.command else {
            panic!("expected Dsl command");
        };
        assert_eq!(args.input, PathBuf::from("store.json"));
        assert_eq!(args.deployment.as_deref(), Some("k8s"));
        assert!(!args.skip_user_management);
    }

    #[test]
    fn parse_export_command() {
        let cli = Cli::parse_from([
            "blueprint",
            "export",
            "apps/",
            "--communications",
            "comms.json",
            "-o",
            "ws",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("expected Export command");
        };
        assert_eq!(args.communications, Some(PathBuf::from("comms.json")));
        assert_eq!(args.output, Some(PathBuf::from("ws")));
        assert!(!args.single);
    }

    #[test]
    fn deployment_alias_and_flags() {
        let cli = Cli::parse_from(["blueprint", "deploy", "openshift", "--strict", "--full"]);
        let Commands::Deployment(args) = cli.command else {
            panic!("expected Deployment command");
        };
        assert_eq!(args.tag, "openshift");
        assert!(args.strict && args.full);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["blueprint", "dsl", "a.json", "-vv", "--output-format", "json"]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["blueprint", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn init_global_and_local_conflict() {
        let result = Cli::try_parse_from(["blueprint", "init", "--global", "--local"]);
        assert!(result.is_err());
    }
}
