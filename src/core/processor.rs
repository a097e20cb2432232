// src/core/processor.rs

//! The two pipelines of the crate: config file to grammar, and input line to
//! `InputDict`. Each comes in two forms: one taking `Settings`, and a `_with`
//! form taking the `Reporter` so the caller can collect the warnings.

use log::debug;
use serde_json::Value;

use crate::{
    core::{
        diagnostics::{Reporter, ValidationError},
        input_parser::parse_input,
        input_validator::InputValidator,
        schema_parser::build_config,
        schema_validator::SchemaValidator,
        tokenizer::tokenize,
    },
    models::{CommandsConfig, InputDict},
    settings::Settings,
    system::reader,
};

/// Reads, validates and builds the grammar stored at `file_path`.
pub fn load_config(settings: &Settings, file_path: &str) -> Result<CommandsConfig, ValidationError> {
    load_config_with(&mut settings.reporter(), file_path)
}

pub fn load_config_with(
    reporter: &mut Reporter,
    file_path: &str,
) -> Result<CommandsConfig, ValidationError> {
    debug!("Loading config from '{}'", file_path);
    let raw = reader::read_file(reporter, file_path)?;
    parse_config_value_with(reporter, &raw)
}

/// Validates and builds a grammar from an in-memory mapping.
pub fn parse_config_value(settings: &Settings, value: &Value) -> Result<CommandsConfig, ValidationError> {
    parse_config_value_with(&mut settings.reporter(), value)
}

pub fn parse_config_value_with(
    reporter: &mut Reporter,
    value: &Value,
) -> Result<CommandsConfig, ValidationError> {
    let validated = SchemaValidator::new(reporter).validate_config(value)?;
    Ok(build_config(validated))
}

/// Tokenizes, validates and parses one line of input.
///
/// Without a config the input is still parsed, but no fallback defaults can
/// be filled in.
pub fn process_input(
    settings: &Settings,
    config: Option<&CommandsConfig>,
    input_str: &str,
) -> Result<InputDict, ValidationError> {
    process_input_with(&mut settings.reporter(), config, input_str)
}

pub fn process_input_with(
    reporter: &mut Reporter,
    config: Option<&CommandsConfig>,
    input_str: &str,
) -> Result<InputDict, ValidationError> {
    debug!("Processing input '{}'", input_str);
    let raw_tokens = tokenize(input_str);
    let tokens = InputValidator::new(reporter, config, &raw_tokens).validate_input()?;
    let input = parse_input(tokens);
    debug!("Parsed input: {:?}", input);
    Ok(input)
}
