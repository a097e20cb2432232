// src/cli/handlers/parse.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, settings::Settings};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Parses one line of input against a config and validates it in the current state."
)]
struct ParseArgs {
    /// Path of the config file.
    config: String,

    /// The input line. Words are joined with spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,
}

pub fn handle(args: Vec<String>, settings: Settings) -> Result<()> {
    let parse_args = ParseArgs::try_parse_from(&args)?;
    let (system, warnings) = commons::load_system(settings, &parse_args.config)?;
    commons::print_diagnostics(&warnings);

    let input_str = commons::join_input(&parse_args.input);
    let input = system
        .process_input(&input_str)
        .with_context(|| format!("Failed to process input '{}'", input_str))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&input).context("Failed to serialize input to JSON.")?
    );

    let state = system.current_state();
    if system.is_input_valid(&input)? {
        println!("{}", format!(t!("cli.parse.valid"), state = state).green());
        let normalized = system.get_normalized_path(&input).join(" ");
        println!("{}", format!(t!("cli.parse.normalized"), path = normalized).cyan());
    } else {
        println!("{}", format!(t!("cli.parse.invalid"), state = state).red());
    }
    Ok(())
}
