// src/cli/handlers/mod.rs

pub mod check;
pub mod commons;
pub mod parse;
pub mod repl;
pub mod tree;
