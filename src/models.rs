// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::constants::{BASE_STATE, RESERVED_STATES};

// --- COMMAND GRAMMAR ---
// The immutable tree built from a validated config. Nothing in here is ever
// mutated after `schema_parser::build_config` returns.

/// The four kinds of node a command tree is made of.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Word,
    Fallback,
    Flag,
    Option,
}

impl CommandType {
    /// Parses the `type` literal of a config entry.
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "word" => Some(Self::Word),
            "fallback" => Some(Self::Fallback),
            "flag" => Some(Self::Flag),
            "option" => Some(Self::Option),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Fallback => "fallback",
            Self::Flag => "flag",
            Self::Option => "option",
        }
    }

    pub fn allows_aliases(self) -> bool {
        matches!(self, Self::Word | Self::Flag | Self::Option)
    }

    pub fn allows_default(self) -> bool {
        matches!(self, Self::Fallback | Self::Flag | Self::Option)
    }

    pub fn allows_children(self) -> bool {
        matches!(self, Self::Word | Self::Fallback)
    }

    /// Word and fallback nodes consume path segments; flags and options don't.
    pub fn is_positional(self) -> bool {
        matches!(self, Self::Word | Self::Fallback)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alternative spelling of a command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasNode {
    pub original_name: String,
    pub alias_name: String,
}

/// A node of the command tree.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommandNode {
    Word {
        name: String,
        aliases: Vec<AliasNode>,
        children: Vec<CommandNode>,
    },
    Fallback {
        name: String,
        default: Value,
        children: Vec<CommandNode>,
    },
    Flag {
        name: String,
        aliases: Vec<AliasNode>,
        default: Option<bool>,
    },
    Option {
        name: String,
        aliases: Vec<AliasNode>,
        default: Value,
    },
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Word { name, .. }
            | Self::Fallback { name, .. }
            | Self::Flag { name, .. }
            | Self::Option { name, .. } => name,
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Word { .. } => CommandType::Word,
            Self::Fallback { .. } => CommandType::Fallback,
            Self::Flag { .. } => CommandType::Flag,
            Self::Option { .. } => CommandType::Option,
        }
    }

    /// Aliases of the node. Fallbacks never have any.
    pub fn aliases(&self) -> &[AliasNode] {
        match self {
            Self::Word { aliases, .. } | Self::Flag { aliases, .. } | Self::Option { aliases, .. } => {
                aliases
            }
            Self::Fallback { .. } => &[],
        }
    }

    /// Children of the node. Flags and options are always leaves.
    pub fn children(&self) -> &[CommandNode] {
        match self {
            Self::Word { children, .. } | Self::Fallback { children, .. } => children,
            Self::Flag { .. } | Self::Option { .. } => &[],
        }
    }

    /// The configured default, `Value::Null` when there is none.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Word { .. } => Value::Null,
            Self::Fallback { default, .. } | Self::Option { default, .. } => default.clone(),
            Self::Flag { default, .. } => default.map_or(Value::Null, Value::Bool),
        }
    }

    /// True if `segment` is the node's name or one of its aliases.
    pub fn matches_name(&self, segment: &str) -> bool {
        self.name() == segment || self.aliases().iter().any(|a| a.alias_name == segment)
    }

    /// Finds the positional node a path segment selects among `level`.
    ///
    /// The first node in declaration order that is either a word matched by
    /// name or alias, or a fallback (which accepts any segment).
    pub fn find_positional<'a>(level: &'a [CommandNode], segment: &str) -> Option<&'a CommandNode> {
        level.iter().find(|node| match node {
            Self::Word { .. } => node.matches_name(segment),
            Self::Fallback { .. } => true,
            Self::Flag { .. } | Self::Option { .. } => false,
        })
    }
}

impl PartialEq for CommandNode {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.command_type() == other.command_type()
    }
}

impl Eq for CommandNode {}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.command_type())?;

        let aliases = self.aliases();
        if !aliases.is_empty() {
            let names: Vec<&str> = aliases.iter().map(|a| a.alias_name.as_str()).collect();
            write!(f, " [aliases: {}]", names.join(", "))?;
        }

        let default = self.default_value();
        if !default.is_null() {
            write!(f, " default: {}", default)?;
        }
        Ok(())
    }
}

/// A named group of top-level commands reachable together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StateNode {
    pub name: String,
    pub is_internal: bool,
    pub commands: Vec<String>,
}

impl StateNode {
    pub fn new(name: String, commands: Vec<String>) -> Self {
        let is_internal = RESERVED_STATES.contains(&name.as_str());
        Self {
            name,
            is_internal,
            commands,
        }
    }
}

/// A fully validated command grammar.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandsConfig {
    pub version: i64,
    pub states: Vec<StateNode>,
    pub commands: Vec<CommandNode>,
}

impl CommandsConfig {
    pub fn state(&self, name: &str) -> Option<&StateNode> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Looks up a top-level command by its canonical name.
    pub fn command(&self, name: &str) -> Option<&CommandNode> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// True if `command` is listed by `state` or by the always-reachable base state.
    pub fn is_reachable(&self, command: &str, state: &str) -> bool {
        self.states.iter().any(|s| {
            (s.name == state || s.name == BASE_STATE) && s.commands.iter().any(|c| c == command)
        })
    }
}

// --- VALIDATED CONFIG ---
// Output of the schema validator: plain data in declaration order, with every
// anomaly already corrected. Duplicate keys are merged by `upsert`.

/// A command entry that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCommand {
    pub command_type: CommandType,
    pub aliases: Vec<String>,
    pub default: Option<Value>,
    pub children: Vec<(String, ValidatedCommand)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub version: i64,
    pub states: Vec<(String, Vec<String>)>,
    pub commands: Vec<(String, ValidatedCommand)>,
}

/// Inserts `(key, value)`, replacing the value in place if `key` is already present.
pub fn upsert<T>(entries: &mut Vec<(String, T)>, key: String, value: T) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

// --- INPUT TOKENS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTokenType {
    Space,
    Word,
    Minus,
    Not,
    String,
}

/// A lexical unit of the user's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputToken {
    pub kind: RawTokenType,
    pub value: String,
}

impl RawInputToken {
    pub fn new(kind: RawTokenType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A token after flag/option disambiguation.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalInputToken {
    Word { value: String },
    Flag { name: String, value: bool },
    Option { name: String, value: Value },
}

/// The structured form of one line of input.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InputDict {
    pub path: Vec<String>,
    pub flags: HashMap<String, Option<bool>>,
    pub options: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word(name: &str, aliases: &[&str], children: Vec<CommandNode>) -> CommandNode {
        CommandNode::Word {
            name: name.to_string(),
            aliases: aliases
                .iter()
                .map(|a| AliasNode {
                    original_name: name.to_string(),
                    alias_name: a.to_string(),
                })
                .collect(),
            children,
        }
    }

    #[test]
    fn test_command_type_literals() {
        assert_eq!(CommandType::from_literal("word"), Some(CommandType::Word));
        assert_eq!(CommandType::from_literal("fallback"), Some(CommandType::Fallback));
        assert_eq!(CommandType::from_literal("Word"), None);
        assert!(CommandType::Flag.allows_default());
        assert!(!CommandType::Flag.allows_children());
        assert!(!CommandType::Fallback.allows_aliases());
    }

    #[test]
    fn test_equality_is_by_name_and_type() {
        let a = word("start", &["s"], vec![]);
        let b = word("start", &[], vec![word("x", &[], vec![])]);
        let c = CommandNode::Flag {
            name: "start".to_string(),
            aliases: vec![],
            default: None,
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn fallback(name: &str) -> CommandNode {
        CommandNode::Fallback {
            name: name.to_string(),
            default: Value::Null,
            children: vec![],
        }
    }

    #[test]
    fn test_find_positional_follows_declaration_order() {
        let word_first = vec![word("start", &["s"], vec![]), fallback("$any")];
        assert_eq!(CommandNode::find_positional(&word_first, "s").map(|n| n.name()), Some("start"));
        assert_eq!(CommandNode::find_positional(&word_first, "zzz").map(|n| n.name()), Some("$any"));

        let fallback_first = vec![fallback("$any"), word("start", &["s"], vec![])];
        assert_eq!(CommandNode::find_positional(&fallback_first, "start").map(|n| n.name()), Some("$any"));

        assert!(CommandNode::find_positional(&[word("a", &[], vec![])], "b").is_none());
    }

    #[test]
    fn test_display_is_compact() {
        let node = CommandNode::Option {
            name: "depth".to_string(),
            aliases: vec![AliasNode {
                original_name: "depth".to_string(),
                alias_name: "d".to_string(),
            }],
            default: json!(3),
        };
        assert_eq!(node.to_string(), "depth (option) [aliases: d] default: 3");
    }

    #[test]
    fn test_reachability_uses_base_state() {
        let config = CommandsConfig {
            version: 1,
            states: vec![
                StateNode::new("menu".to_string(), vec!["start".to_string()]),
                StateNode::new(BASE_STATE.to_string(), vec!["help".to_string()]),
            ],
            commands: vec![],
        };
        assert!(config.state(BASE_STATE).is_some_and(|s| s.is_internal));
        assert!(config.is_reachable("start", "menu"));
        assert!(config.is_reachable("help", "menu"));
        assert!(!config.is_reachable("start", "game"));
    }

    #[test]
    fn test_upsert_keeps_first_position() {
        let mut entries = vec![("a".to_string(), 1), ("b".to_string(), 2)];
        upsert(&mut entries, "a".to_string(), 3);
        upsert(&mut entries, "c".to_string(), 4);
        assert_eq!(
            entries,
            vec![("a".to_string(), 3), ("b".to_string(), 2), ("c".to_string(), 4)]
        );
    }
}
