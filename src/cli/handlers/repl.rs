// src/cli/handlers/repl.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};
use log::debug;

use crate::{
    cli::handlers::commons,
    core::{command_system::CommandSystem, path_resolver::CommandPath},
    models::InputDict,
    settings::Settings,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Starts an interactive session that routes input through a config."
)]
struct ReplArgs {
    /// Path of the config file.
    config: String,

    /// Don't record input in the history.
    #[arg(long)]
    no_history: bool,
}

/// What a line typed in the session asks for.
#[derive(Debug, PartialEq, Eq)]
enum MetaCommand<'a> {
    State(Option<&'a str>),
    History,
    Commands,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_meta(line: &str) -> Option<MetaCommand<'_>> {
    let rest = line.strip_prefix(':')?;
    let mut words = rest.split_whitespace();
    let meta = match words.next().unwrap_or_default() {
        "state" => MetaCommand::State(words.next()),
        "history" => MetaCommand::History,
        "commands" => MetaCommand::Commands,
        "help" => MetaCommand::Help,
        "quit" | "exit" | "q" => MetaCommand::Quit,
        other => MetaCommand::Unknown(other),
    };
    Some(meta)
}

pub fn handle(args: Vec<String>, settings: Settings) -> Result<()> {
    let repl_args = ReplArgs::try_parse_from(&args)?;
    let (mut system, warnings) = commons::load_system(settings, &repl_args.config)?;
    commons::print_diagnostics(&warnings);

    register_echo_handlers(&mut system);

    println!(
        "\n{}",
        format!(t!("cli.repl.welcome"), state = system.current_state()).bold()
    );

    loop {
        let line = match Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} [{}]", t!("cli.repl.prompt"), system.current_state()))
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                debug!("Leaving session: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_meta(line) {
            Some(MetaCommand::Quit) => break,
            Some(meta) => run_meta(&mut system, meta),
            None => run_line(&mut system, line, !repl_args.no_history),
        }
    }
    Ok(())
}

/// Routes every top-level command to a handler that prints what it received.
fn register_echo_handlers(system: &mut CommandSystem) {
    let names: Vec<String> = system
        .get_all_commands_str()
        .into_iter()
        .map(str::to_string)
        .collect();

    for name in names {
        system.register_command(CommandPath::from([name.as_str()]), |_, input| {
            println!("{}", describe(input).green());
        });
    }
}

fn describe(input: &InputDict) -> String {
    let mut flags: Vec<(&String, &Option<bool>)> = input.flags.iter().collect();
    flags.sort_by(|a, b| a.0.cmp(b.0));
    let flags: Vec<String> = flags
        .into_iter()
        .map(|(name, value)| match value {
            Some(true) => name.clone(),
            Some(false) => format!("!{}", name),
            None => format!("{}?", name),
        })
        .collect();

    let mut options: Vec<(&String, &serde_json::Value)> = input.options.iter().collect();
    options.sort_by(|a, b| a.0.cmp(b.0));
    let options: Vec<String> = options
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    format!(
        t!("cli.repl.executed"),
        path = input.path.join(" "),
        flags = flags.join(", "),
        options = options.join(", ")
    )
}

fn run_line(system: &mut CommandSystem, line: &str, tracking: bool) {
    let input = match system.process_input(line) {
        Ok(input) => input,
        Err(e) => {
            println!("{} {}", format!(t!("cli.repl.rejected"), input = line).red(), e);
            return;
        }
    };

    match system.is_input_valid(&input) {
        Ok(true) => {}
        Ok(false) => {
            println!("{}", format!(t!("cli.repl.rejected"), input = line).red());
            return;
        }
        Err(e) => {
            println!("{} {}", format!(t!("cli.repl.rejected"), input = line).red(), e);
            return;
        }
    }

    let normalized = system.get_normalized_path(&input);
    if !system.execute(line, &input, &normalized, tracking) {
        println!("{}", format!(t!("cli.repl.not_executed"), input = line).yellow());
    }
}

fn run_meta(system: &mut CommandSystem, meta: MetaCommand<'_>) {
    match meta {
        MetaCommand::State(Some(state)) => {
            system.set_state(state);
            println!("{}", format!(t!("cli.repl.state_changed"), state = state).cyan());
        }
        MetaCommand::State(None) => println!("{}", system.current_state()),
        MetaCommand::History => {
            let inputs = system.get_history_input();
            if inputs.is_empty() {
                println!("{}", t!("cli.repl.history_empty").dimmed());
            }
            for (i, input) in inputs.iter().enumerate() {
                println!("  {:>3}  {}", i + 1, input);
            }
        }
        MetaCommand::Commands => {
            for name in system.get_available_commands_str() {
                println!("  {}", name.cyan());
            }
        }
        MetaCommand::Help => println!("{}", t!("cli.repl.help")),
        MetaCommand::Quit => {}
        MetaCommand::Unknown(command) => {
            println!("{}", format!(t!("cli.repl.unknown_meta"), command = command).yellow());
        }
    }
}
