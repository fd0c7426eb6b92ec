//! # Stasis
//! Suspends and resumes containers recorded in a state directory. Containers
//! are named by full ID, unique ID prefix, or name, several at a time; one
//! bad reference never stops the others.
mod commands;
mod observability;
mod rootpath;
mod signal;

use anyhow::Result;
use clap::{crate_version, Parser};
use libstasis::cancel::CancelToken;
use libstasis_cli::{Command, GlobalOpts};

// High-level commandline option definition
#[derive(Parser, Debug)]
#[clap(version = crate_version!(), author = env!("CARGO_PKG_AUTHORS"))]
struct Opts {
    #[clap(flatten)]
    global: GlobalOpts,

    #[clap(flatten)]
    stasis_extend: StasisExtendOpts,

    #[clap(subcommand)]
    subcmd: Command,
}

// Flags that only make sense for this binary
#[derive(Parser, Debug)]
struct StasisExtendOpts {
    /// set the log level (default is 'error')
    #[clap(long)]
    pub log_level: Option<String>,
    /// Also send logs to the systemd journal
    #[clap(long)]
    pub systemd_log: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    if let Err(e) = observability::init(&opts) {
        eprintln!("log init failed: {:?}", e);
    }

    tracing::debug!(
        "started by user {} with {:?}",
        nix::unistd::geteuid(),
        std::env::args_os()
    );
    let root_path = rootpath::determine(opts.global.root)?;
    let cancel = CancelToken::new();
    signal::cancel_on_interrupt(&cancel)?;

    match opts.subcmd {
        Command::Pause(pause) => commands::pause::pause(pause, root_path, cancel),
        Command::Resume(resume) => commands::resume::resume(resume, root_path, cancel),
        Command::List(list) => commands::list::list(list, root_path),
    }
}
