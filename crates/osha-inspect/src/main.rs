mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use osha_inspect::logging::{init_tracing, LogFormat};

use crate::cli::{Cli, LogFormatArg};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    });
    commands::run(cli.config.as_deref(), cli.command)
}
