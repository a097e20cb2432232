// src/core/schema_parser.rs

use log::debug;
use serde_json::Value;

use crate::models::{
    AliasNode, CommandNode, CommandType, CommandsConfig, StateNode, ValidatedCommand,
    ValidatedConfig,
};

/// Builds the immutable command grammar from a validated config.
pub fn build_config(validated: ValidatedConfig) -> CommandsConfig {
    let commands = build_commands(validated.commands);
    let states = validated
        .states
        .into_iter()
        .map(|(name, commands)| StateNode::new(name, commands))
        .collect();

    debug!("Built command grammar with {} top-level commands", commands.len());
    CommandsConfig {
        version: validated.version,
        states,
        commands,
    }
}

fn build_commands(entries: Vec<(String, ValidatedCommand)>) -> Vec<CommandNode> {
    entries
        .into_iter()
        .map(|(name, command)| build_command(name, command))
        .collect()
}

/// Node factory keyed on the command type.
fn build_command(name: String, command: ValidatedCommand) -> CommandNode {
    let aliases: Vec<AliasNode> = command
        .aliases
        .into_iter()
        .map(|alias_name| AliasNode {
            original_name: name.clone(),
            alias_name,
        })
        .collect();

    match command.command_type {
        CommandType::Word => CommandNode::Word {
            name,
            aliases,
            children: build_commands(command.children),
        },
        CommandType::Fallback => CommandNode::Fallback {
            name,
            default: command.default.unwrap_or(Value::Null),
            children: build_commands(command.children),
        },
        CommandType::Flag => CommandNode::Flag {
            name,
            aliases,
            default: command.default.and_then(|v| v.as_bool()),
        },
        CommandType::Option => CommandNode::Option {
            name,
            aliases,
            default: command.default.unwrap_or(Value::Null),
        },
    }
}
