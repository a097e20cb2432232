// src/cli/handlers/tree.rs

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::handlers::commons,
    core::tree_display::{self, DisplayOptions},
    settings::Settings,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Displays the command grammar of a config file as a tree."
)]
struct TreeArgs {
    /// Path of the config file.
    config: String,

    /// Limit the depth of the tree display.
    #[arg(long, short)]
    depth: Option<usize>,

    /// Also list the states and the commands they allow.
    #[arg(long, short)]
    states: bool,
}

pub fn handle(args: Vec<String>, settings: Settings) -> Result<()> {
    let tree_args = TreeArgs::try_parse_from(&args)?;
    let (system, warnings) = commons::load_system(settings, &tree_args.config)?;
    commons::print_diagnostics(&warnings);

    let display_options = DisplayOptions {
        max_depth: tree_args.depth,
        show_states: tree_args.states,
    };
    if let Some(config) = system.config() {
        tree_display::display_tree(config, &display_options);
    }
    Ok(())
}
