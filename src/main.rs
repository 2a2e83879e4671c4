//! outctl - governs a build output directory between builds.

mod cli;
mod error;
mod host;

use crate::cli::{Cli, Commands, LedgerCommand};
use crate::error::{ErrorKind, Result};
use crate::host::{DirectoryCompilation, parse_manifest};
use clap::Parser;
use exn::ResultExt;
use outctl_config::Config;
use outctl_governor::{AssetAction, BuildResult, Compilation, Completion, Plugin, PluginOptions};
use outctl_ledger::store::FileStore;
use outctl_ledger::{AssetLedger, DEFAULT_SNAPSHOT, StoreHandle};
use outctl_rules::Redirect;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "outctl failed");
            eprintln!("error: {}", &*err);
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(quiet: bool) {
    let fallback = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_env("OUTCTL_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().or_raise(|| ErrorKind::Config)?;
    let config = Config::load(&cwd, cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Commands::Run { output, manifest, failed, dry_run } => {
            let output = output.map(|path| cwd.join(path)).or_else(|| config.output_dir(&cwd));
            let names = read_manifest(&manifest)?;
            let mut options = PluginOptions::try_from(config).or_raise(|| ErrorKind::Options)?;
            options.delete.dry_run |= dry_run;
            govern(&cwd, options, output, &names, failed).await
        },
        Commands::Preview { names } => {
            let options = PluginOptions::try_from(config).or_raise(|| ErrorKind::Options)?;
            for name in names {
                match options.control.redirect(&name) {
                    Redirect::Unchanged(_) => println!("{name} (unchanged)"),
                    Redirect::Renamed(to) => println!("{name} -> {to}"),
                    Redirect::Deleted => println!("{name} -> (dropped)"),
                }
            }
            Ok(())
        },
        Commands::Ledger { command } => {
            let path = config.ledger_path(&cwd).unwrap_or_else(|| cwd.join(DEFAULT_SNAPSHOT));
            let store: StoreHandle = Arc::new(FileStore::new(&path).or_raise(|| ErrorKind::Ledger)?);
            let mut ledger = AssetLedger::load(store).await;
            match command {
                LedgerCommand::Show => ledger.previous().iter().for_each(|name| println!("{name}")),
                LedgerCommand::Reset => {
                    ledger.reset().await.or_raise(|| ErrorKind::Ledger)?;
                    tracing::info!(path = %path.display(), "Ledger reset");
                },
            }
            Ok(())
        },
    }
}

async fn govern(cwd: &Path, options: PluginOptions, output: Option<PathBuf>, names: &[String], failed: bool) -> Result<()> {
    let dry_run = options.delete.dry_run;
    let plugin = Plugin::in_dir(options, cwd).or_raise(|| ErrorKind::Options)?;
    let Some(mut governor) = plugin.apply(output).await else {
        return Ok(());
    };

    let mut compilation = DirectoryCompilation::new(governor.output(), names, dry_run);
    for action in governor.finalize_assets(&mut compilation) {
        match action {
            AssetAction::Rename { from, to } => println!("rename {from} -> {to}"),
            AssetAction::Delete { name } => println!("drop {name}"),
        }
    }

    let result = match failed {
        true => BuildResult::failed(),
        false => BuildResult::succeeded(compilation.asset_names()),
    };
    if let Completion::Settled { removed, .. } = governor.complete(result).await {
        let verb = if dry_run { "would remove" } else { "remove" };
        for path in removed {
            println!("{verb} {}", path.strip_prefix(cwd).unwrap_or(&path).display());
        }
    }
    governor.settle().await;
    Ok(())
}

fn read_manifest(manifest: &Path) -> Result<Vec<String>> {
    let mut contents = String::new();
    if manifest == Path::new("-") {
        std::io::stdin().read_to_string(&mut contents).or_raise(|| ErrorKind::Manifest(manifest.to_path_buf()))?;
    } else {
        contents = std::fs::read_to_string(manifest).or_raise(|| ErrorKind::Manifest(manifest.to_path_buf()))?;
    }
    Ok(parse_manifest(&contents))
}
