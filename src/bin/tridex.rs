//! Tridex CLI binary.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use tridex::cli::args::TridexArgs;
use tridex::cli::commands::execute_command;

fn main() -> anyhow::Result<()> {
    let args = TridexArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .parse_env("TRIDEX_LOG")
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let store = args.store.display().to_string();
    execute_command(args).with_context(|| format!("tridex failed on store '{store}'"))
}
