// src/cli/handlers/check.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons,
    core::tree_display::{self, DisplayOptions},
    settings::Settings,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Validates a config file and lists every anomaly found."
)]
struct CheckArgs {
    /// Path of the config file.
    config: String,
}

pub fn handle(args: Vec<String>, settings: Settings) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;
    let (system, warnings) = commons::load_system(settings, &check_args.config)?;

    println!(
        "\n{}",
        format!(t!("cli.check.header"), path = check_args.config).bold()
    );
    if warnings.is_empty() {
        println!("{}", t!("cli.check.no_warnings").green());
    } else {
        println!("{}", format!(t!("cli.check.warnings"), count = warnings.len()).yellow());
        commons::print_diagnostics(&warnings);
    }

    if let Some(config) = system.config() {
        let options = DisplayOptions {
            max_depth: None,
            show_states: true,
        };
        tree_display::display_tree(config, &options);
    }
    Ok(())
}
