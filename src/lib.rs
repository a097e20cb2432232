// src/lib.rs

//! A declarative command grammar for console tools.
//!
//! A JSON config describes commands (words, fallbacks, flags, options), their
//! aliases and defaults, and the states in which each top-level command is
//! reachable. `CommandSystem` validates that config, turns input lines into
//! `InputDict`s, checks them against the current state, and routes them to
//! registered handlers while keeping a bounded history.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod settings;
pub mod system;

pub use crate::core::{
    command_system::{CommandSystem, Handler},
    diagnostics::{Diagnostic, IssueKind, ValidationError, WarningsLevel},
    history::CommandHistory,
    path_resolver::{CommandPath, PathSegment},
};
pub use crate::models::{CommandNode, CommandType, CommandsConfig, InputDict};
pub use crate::settings::Settings;
