// src/cli/mod.rs

use clap::Parser;
use std::path::PathBuf;

use crate::core::diagnostics::WarningsLevel;

pub mod dispatcher;
pub mod handlers;

/// cmdsys: validate command grammars and try input against them.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// How anomalies are handled: ignore, basic (warn) or strict (fail).
    #[arg(long, short, value_enum)]
    pub level: Option<WarningsLevel>,

    /// The state input is validated in.
    #[arg(long, short)]
    pub state: Option<String>,

    /// Settings file to use instead of the one in the user config directory.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// The action (check, parse, tree, repl) followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
