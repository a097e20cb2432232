// src/core/tree_display.rs

use colored::Colorize;

use crate::models::{CommandNode, CommandsConfig};

/// What `render_tree` includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    /// Deepest level rendered; `Some(0)` shows only top-level commands.
    pub max_depth: Option<usize>,
    /// Appends the state table after the commands.
    pub show_states: bool,
}

/// Renders the command grammar as an ASCII tree, one line per command.
pub fn render_tree(config: &CommandsConfig, options: &DisplayOptions) -> Vec<String> {
    let mut lines = render_commands(config, options);
    if options.show_states {
        lines.extend(render_states(config));
    }
    lines
}

fn render_commands(config: &CommandsConfig, options: &DisplayOptions) -> Vec<String> {
    let mut lines = Vec::new();
    let count = config.commands.len();
    for (i, node) in config.commands.iter().enumerate() {
        render_node(node, "", i + 1 == count, 0, options, &mut lines);
    }
    lines
}

fn render_states(config: &CommandsConfig) -> Vec<String> {
    let count = config.states.len();
    config
        .states
        .iter()
        .enumerate()
        .map(|(i, state)| {
            let connector = if i + 1 == count { "└─" } else { "├─" };
            format!("{}{}: {}", connector, state.name, state.commands.join(", "))
        })
        .collect()
}

fn render_node(
    node: &CommandNode,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &DisplayOptions,
    lines: &mut Vec<String>,
) {
    let connector = if is_last { "└─" } else { "├─" };
    lines.push(format!("{}{}{}", prefix, connector, node));

    if options.max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == children.len(), depth + 1, options, lines);
    }
}

/// Prints the tree with a colored header for each section.
pub fn display_tree(config: &CommandsConfig, options: &DisplayOptions) {
    println!(
        "\n{}",
        format!(t!("cli.tree.header"), version = config.version).bold()
    );

    if config.commands.is_empty() {
        println!("{}", t!("cli.tree.empty").dimmed());
    }

    for line in render_commands(config, options) {
        println!("{}", line);
    }

    if options.show_states {
        println!("\n{}", t!("cli.tree.states").bold());
        for line in render_states(config) {
            println!("{}", line.cyan());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processor::parse_config_value;
    use crate::settings::Settings;
    use serde_json::json;

    fn config() -> CommandsConfig {
        parse_config_value(
            &Settings::default(),
            &json!({
                "version": 1,
                "commands": {
                    "start": {"type": "word", "aliases": ["s"], "children": {
                        "$level": {"type": "fallback", "default": "easy"},
                        "fast": {"type": "flag"}
                    }},
                    "help": {"type": "word"}
                },
                "states": {"__base__": ["help"]}
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_render_full_tree() {
        let lines = render_tree(&config(), &DisplayOptions::default());
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("├─start (word)"));
        assert!(lines[1].starts_with("│  ├─$level (fallback)"));
        assert!(lines[2].starts_with("│  └─fast (flag)"));
        assert!(lines[3].starts_with("└─help (word)"));
    }

    #[test]
    fn test_max_depth_and_states() {
        let options = DisplayOptions {
            max_depth: Some(0),
            show_states: true,
        };
        let lines = render_tree(&config(), &options);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "└─__base__: help");
    }
}
