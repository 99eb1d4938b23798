#![warn(rust_2024_compatibility, clippy::all)]
#![allow(
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::needless_pass_by_value
)]

mod cli;
mod config;
mod files;
mod init;
mod lint;
mod options;
mod output;
mod warden;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use init::run_init;
use lint::run_once;
use options::run_options;

fn main() -> Result<()> {
    // stdout carries diagnostics; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Lint(lint) => run_once(&lint),
        Command::Options(options) => run_options(&options),
        Command::Init(init) => run_init(init),
    }
}
