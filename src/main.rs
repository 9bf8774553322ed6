use std::{io, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

use deferred_acceptance::{
    loader, stable_matching, ExhaustionPolicy, MatchConfig, UnlistedPolicy,
};

/// Computes the hospital-optimal stable matching of an instance.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Instance file, read from stdin when omitted.
    input: Option<PathBuf>,

    /// How students rank hospitals missing from their list.
    #[arg(long, value_enum, default_value_t)]
    unlisted: UnlistedPolicy,

    /// What to do when a hospital runs out of students to propose to.
    #[arg(long, value_enum, default_value_t)]
    on_exhaustion: ExhaustionPolicy,

    /// Check the result for blocking pairs before printing it.
    #[arg(long)]
    verify: bool,
}

fn setup_logger() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::IsTerminal::is_terminal(&io::stderr()))
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_logger();
    let args = Args::parse();

    let prefs = match &args.input {
        Some(path) => loader::load_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => loader::load_reader(io::stdin().lock()).context("failed to load stdin")?,
    };

    let unlisted = prefs.unlisted_pairs().count();
    if unlisted > 0 && args.unlisted != UnlistedPolicy::Reject {
        warn!(
            pairs = unlisted,
            policy = ?args.unlisted,
            "hospitals list students that do not list them back"
        );
    }

    let config = MatchConfig::new()
        .unlisted(args.unlisted)
        .exhaustion(args.on_exhaustion);
    let matching = stable_matching(&prefs, config)?;
    info!(proposals = matching.proposals(), "matching computed");

    if args.verify {
        let blocking = matching.blocking_pairs(&prefs, args.unlisted);
        if let Some(&(hospital, student)) = blocking.first() {
            bail!(
                "{} blocking pair(s), first is hospital {} with student {}",
                blocking.len(),
                hospital + 1,
                student + 1
            );
        }
    }

    loader::write_assignments(&matching, io::stdout().lock())?;
    Ok(())
}
