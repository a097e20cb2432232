// src/cli/dispatcher.rs

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::{
    cli::{Cli, handlers},
    settings::Settings,
};

/// An action of the binary, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, Settings) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "check",
        aliases: &["lint"],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "parse",
        aliases: &["p"],
        handler: handlers::parse::handle,
    },
    CommandDefinition {
        name: "tree",
        aliases: &["ls"],
        handler: handlers::tree::handle,
    },
    CommandDefinition {
        name: "repl",
        aliases: &["shell"],
        handler: handlers::repl::handle,
    },
];

/// Finds an action in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn action_names() -> String {
    COMMAND_REGISTRY
        .iter()
        .map(|cmd| cmd.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads the settings, applies the global overrides and dispatches.
pub fn run(cli: Cli) -> Result<()> {
    debug!("CLI args parsed: {:?}", cli);

    let mut settings = Settings::load_or_default(cli.settings.as_deref())
        .context("Failed to load settings")?;
    if let Some(level) = cli.level {
        settings.warnings_level = level;
    }
    if let Some(state) = cli.state {
        settings.current_state = state;
    }

    dispatch(cli.args, settings)
}

/// Routes `all_args` to the action named by the first of them.
pub fn dispatch(all_args: Vec<String>, settings: Settings) -> Result<()> {
    debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(action) = args.next() else {
        return Err(anyhow!(t!("cli.no_action"), actions = action_names()));
    };

    match find_command(&action) {
        Some(command) => (command.handler)(args.collect(), settings),
        None => Err(anyhow!(
            t!("cli.unknown_action"),
            name = action,
            actions = action_names()
        )),
    }
}
