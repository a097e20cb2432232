// src/cli/handlers/commons.rs

// Shared by every handler: loading the grammar and reporting its anomalies.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::{
    core::{command_system::CommandSystem, diagnostics::Diagnostic},
    settings::Settings,
};

/// Builds a system from `settings` and loads the grammar at `config_path`.
/// Anomalies below the raise threshold come back alongside the system.
pub fn load_system(settings: Settings, config_path: &str) -> Result<(CommandSystem, Vec<Diagnostic>)> {
    let mut system = CommandSystem::new(settings);
    let warnings = system
        .load_config(config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path))?;
    Ok((system, warnings))
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("  {} {}", "!".yellow().bold(), diagnostic.to_string().yellow());
    }
}

/// Joins the words of an input that the shell split apart. Words holding
/// whitespace are quoted back so the tokenizer sees them as one.
pub fn join_input(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            if word.chars().any(char::is_whitespace) {
                format!("\"{}\"", word.replace('\\', "\\\\").replace('"', "\\\""))
            } else {
                word.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_input_requotes_spaced_words() {
        let words = vec!["say".to_string(), "hello world".to_string(), "-loud".to_string()];
        assert_eq!(join_input(&words), "say \"hello world\" -loud");
    }
}
