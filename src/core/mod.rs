// src/core/mod.rs

pub mod command_system;
pub mod diagnostics;
pub mod history;
pub mod input_parser;
pub mod input_validator;
pub mod path_resolver;
pub mod processor;
pub mod schema_parser;
pub mod schema_validator;
pub mod tokenizer;
pub mod tree_display;
