//! `bplustree` command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # One-shot commands work against tree_state.bin in the current directory
//! bplustree insert 5
//! bplustree --order 3 insert 7
//! bplustree range 1 10
//! bplustree display
//!
//! # Interactive shell
//! bplustree interactive
//!
//! # Environment variables stand in for options
//! BPLUS_SNAPSHOT=/tmp/tree.bin BPLUS_ORDER=5 bplustree insert 42
//!
//! # Keep everything in memory
//! bplustree --no-persist interactive
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bplustree::cli::{Command, Session};
use bplustree::common::config::{DEFAULT_ORDER, DEFAULT_SNAPSHOT_FILE};
use bplustree::{BPlusTree, Key, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// B+ tree index over integer keys with a snapshot file.
#[derive(Debug, Parser)]
#[command(name = "bplustree", version, about)]
struct Cli {
    /// Tree order (max children per internal node). Applied to new trees,
    /// and rebuilds a loaded tree whose order differs.
    #[arg(long, env = "BPLUS_ORDER")]
    order: Option<usize>,

    /// Snapshot file loaded at start and saved after changes.
    #[arg(long, env = "BPLUS_SNAPSHOT", default_value = DEFAULT_SNAPSHOT_FILE)]
    snapshot: PathBuf,

    /// Do not read or write the snapshot file.
    #[arg(long)]
    no_persist: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Insert a value into the tree
    Insert {
        #[arg(allow_negative_numbers = true)]
        value: Key,
    },
    /// Delete a value from the tree
    Delete {
        #[arg(allow_negative_numbers = true)]
        value: Key,
    },
    /// Search for a value in the tree
    Search {
        #[arg(allow_negative_numbers = true)]
        value: Key,
    },
    /// List every value in [low, high]
    Range {
        #[arg(allow_negative_numbers = true)]
        low: Key,
        #[arg(allow_negative_numbers = true)]
        high: Key,
    },
    /// Display the current tree
    Display,
    /// Enter interactive mode
    Interactive,
}

impl CliCommand {
    /// The session command for a one-shot subcommand.
    fn to_command(&self) -> Option<Command> {
        match *self {
            CliCommand::Insert { value } => Some(Command::Insert(value)),
            CliCommand::Delete { value } => Some(Command::Delete(value)),
            CliCommand::Search { value } => Some(Command::Search(value)),
            CliCommand::Range { low, high } => Some(Command::Range(low, high)),
            CliCommand::Display => Some(Command::Display),
            CliCommand::Interactive => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.to_command() {
        Some(command) => {
            session.execute(command, &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            session.run_interactive(stdin.lock(), &mut out)?;
        }
    }
    out.flush()?;

    if session.save_if_dirty()? {
        tracing::debug!(path = %cli.snapshot.display(), "snapshot updated");
    }
    Ok(())
}

fn open_session(cli: &Cli) -> Result<Session> {
    if cli.no_persist {
        return Ok(Session::new(BPlusTree::new(cli.order.unwrap_or(DEFAULT_ORDER))?));
    }

    let mut session = Session::open(&cli.snapshot, cli.order.unwrap_or(DEFAULT_ORDER))?;
    if let Some(order) = cli.order {
        session.set_order(order)?;
    }
    Ok(session)
}

/// Log to stderr so command output on stdout stays clean.
///
/// `RUST_LOG` overrides the default `bplustree=warn` filter.
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bplustree=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
