// src/bin/cmdsys.rs

use clap::Parser;
use cmdsys::{
    cli::{Cli, dispatcher},
    t,
};
use colored::Colorize;

fn main() {
    env_logger::init();

    if let Err(e) = dispatcher::run(Cli::parse()) {
        eprintln!("\n{}: {}", t!("cli.error").red().bold(), e);
        std::process::exit(1);
    }
}
