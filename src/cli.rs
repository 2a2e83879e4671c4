//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keeps a build output directory in step with what the build actually
/// produces: redirects emitted assets and prunes stale ones.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Configuration file (default: outctl.{toml,yaml,yml,json} in the working directory)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Govern one finished build: redirect its assets, then prune stale output
    Run {
        /// Output directory (overrides the configured one)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// File listing the build's assets, one per line ("-" reads stdin)
        #[arg(short, long, default_value = "-", value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Treat the build as failed: no pruning, no ledger update
        #[arg(long)]
        failed: bool,

        /// Report what would change without touching the filesystem or the ledger
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show what the configured rules do to each asset name
    Preview {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Inspect or reset the recorded asset names
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum LedgerCommand {
    /// Print the asset names of the last successful build
    Show,
    /// Forget every recorded name
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_stdin_manifest() {
        let cli = Cli::try_parse_from(["outctl", "run", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Run { manifest, dry_run, failed, output } => {
                assert_eq!(manifest, PathBuf::from("-"));
                assert!(dry_run);
                assert!(!failed);
                assert!(output.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["outctl", "ledger", "show", "--quiet", "-C", "ci.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    }

    #[test]
    fn test_preview_requires_names() {
        assert!(Cli::try_parse_from(["outctl", "preview"]).is_err());
    }
}
