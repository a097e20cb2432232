// src/core/path_resolver.rs

use log::{debug, trace};
use std::fmt;

use crate::{
    constants::ANY_SEGMENT,
    core::diagnostics::{IssueKind, Reporter, ValidationError},
    models::{CommandNode, CommandsConfig, InputDict},
    settings::Settings,
};

/// One segment of a routing pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Matches exactly this name.
    Literal(String),
    /// Matches any single segment. Written `-any`.
    Any,
    /// Matches any of the listed names.
    OneOf(Vec<String>),
}

impl PathSegment {
    pub fn one_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(names.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(name) => name == segment,
            Self::Any => true,
            Self::OneOf(names) => names.iter().any(|n| n == segment),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        if value == ANY_SEGMENT {
            Self::Any
        } else {
            Self::Literal(value.to_string())
        }
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(name) => f.write_str(name),
            Self::Any => f.write_str(ANY_SEGMENT),
            Self::OneOf(names) => write!(f, "{{{}}}", names.join("|")),
        }
    }
}

/// A routing pattern: the key of a handler in the routing table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandPath(pub Vec<PathSegment>);

impl CommandPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for CommandPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandPath {
    fn from(segments: [&str; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl From<Vec<PathSegment>> for CommandPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

/// Checks an input's path, flags and options against the grammar.
///
/// The first segment must name a command reachable from `current_state`.
/// Flags and options must be declared among the children of the deepest
/// command of the path, or among the top-level commands for an empty path.
pub fn validate_commands_path(
    reporter: &mut Reporter,
    current_state: &str,
    input: &InputDict,
    config: &CommandsConfig,
) -> Result<bool, ValidationError> {
    let mut level: &[CommandNode] = &config.commands;

    for (depth, segment) in input.path.iter().enumerate() {
        let Some(node) = CommandNode::find_positional(level, segment) else {
            reporter.report(
                IssueKind::InputValues,
                format!(t!("input.path_invalid"), name = segment),
                t!("fix.skipping"),
            )?;
            return Ok(false);
        };

        if depth == 0 && !config.is_reachable(node.name(), current_state) {
            reporter.report(
                IssueKind::InputValues,
                format!(t!("input.not_in_state"), name = node.name(), state = current_state),
                t!("fix.skipping"),
            )?;
            return Ok(false);
        }

        trace!("Segment '{}' matched '{}'", segment, node.name());
        level = node.children();
    }

    let unknown_flag = input.flags.keys().find(|name| {
        !level
            .iter()
            .any(|n| matches!(n, CommandNode::Flag { .. }) && n.matches_name(name))
    });
    if let Some(name) = unknown_flag {
        debug!("Flag '{}' is not declared here", name);
        reporter.report(
            IssueKind::InputValues,
            format!(t!("input.flag_undeclared"), name = name),
            t!("fix.skipping"),
        )?;
        return Ok(false);
    }

    let unknown_option = input.options.keys().find(|name| {
        !level
            .iter()
            .any(|n| matches!(n, CommandNode::Option { .. }) && n.matches_name(name))
    });
    if let Some(name) = unknown_option {
        debug!("Option '{}' is not declared here", name);
        reporter.report(
            IssueKind::InputValues,
            format!(t!("input.option_undeclared"), name = name),
            t!("fix.skipping"),
        )?;
        return Ok(false);
    }

    Ok(true)
}

/// Validates an input with the context held by `settings`.
pub fn validate_input_dict(
    settings: &Settings,
    input: &InputDict,
    config: &CommandsConfig,
) -> Result<bool, ValidationError> {
    let mut reporter = settings.reporter();
    validate_commands_path(&mut reporter, &settings.current_state, input, config)
}

/// Matches an input path against a routing pattern.
///
/// Inclusive matching needs both to have the same length. Otherwise only the
/// segments both have are compared: an input that runs out before the
/// pattern still matches.
pub fn access_path(input_path: &[String], pattern: &CommandPath, is_inclusive: bool) -> bool {
    let segments = pattern.segments();
    if is_inclusive && input_path.len() != segments.len() {
        return false;
    }
    segments
        .iter()
        .zip(input_path)
        .all(|(segment, part)| segment.matches(part))
}

/// Maps each written segment to the canonical name of the command it
/// selects; fallbacks contribute their own name. Stops at the first segment
/// that selects nothing.
pub fn get_normalized_path(config: &CommandsConfig, input_path: &[String]) -> Vec<String> {
    let mut level: &[CommandNode] = &config.commands;
    let mut result = Vec::with_capacity(input_path.len());

    for segment in input_path {
        let Some(node) = CommandNode::find_positional(level, segment) else {
            break;
        };
        result.push(node.name().to_string());
        level = node.children();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        diagnostics::WarningsLevel, schema_parser::build_config, schema_validator::SchemaValidator,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn config() -> CommandsConfig {
        let raw = json!({
            "version": 1,
            "commands": {
                "start": {"type": "word", "aliases": ["s"], "children": {
                    "$level": {"type": "fallback", "default": "easy"},
                    "fast": {"type": "flag", "aliases": ["f"]},
                    "seed": {"type": "option"}
                }},
                "help": {"type": "word"},
                "quit": {"type": "word"},
                "verbose": {"type": "flag"}
            },
            "states": {
                "menu": ["start"],
                "__base__": ["help"]
            }
        });
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        build_config(
            SchemaValidator::new(&mut reporter)
                .validate_config(&raw)
                .unwrap(),
        )
    }

    fn input(path: &[&str], flags: &[&str], options: &[&str]) -> InputDict {
        InputDict {
            path: path.iter().map(|s| s.to_string()).collect(),
            flags: flags.iter().map(|f| (f.to_string(), Some(true))).collect(),
            options: options.iter().map(|o| (o.to_string(), json!("1"))).collect(),
        }
    }

    fn check(state: &str, dict: &InputDict) -> bool {
        let mut reporter = Reporter::new(WarningsLevel::Basic);
        validate_commands_path(&mut reporter, state, dict, &config()).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // --- State gating ---

    #[test]
    fn test_state_gating() {
        assert!(check("menu", &input(&["start"], &[], &[])));
        assert!(check("menu", &input(&["help"], &[], &[])));
        assert!(check("game", &input(&["help"], &[], &[])));
        assert!(!check("game", &input(&["start"], &[], &[])));
        assert!(!check("menu", &input(&["quit"], &[], &[])));
    }

    #[test]
    fn test_strict_gating_raises_input_values() {
        let settings = Settings {
            current_state: "menu".to_string(),
            ..Settings::default()
        };
        let result = validate_input_dict(&settings, &input(&["quit"], &[], &[]), &config());
        assert!(matches!(result, Err(ValidationError::InputValues(_))));
    }

    #[test]
    fn test_paths_and_aliases() {
        assert!(check("menu", &input(&["s", "hard"], &[], &[])));
        assert!(!check("menu", &input(&["nope"], &[], &[])));
        assert!(check("menu", &input(&[], &[], &[])));
    }

    #[test]
    fn test_flags_and_options_are_scoped_to_deepest_command() {
        assert!(check("menu", &input(&["start"], &["fast", "f"], &["seed"])));
        assert!(!check("menu", &input(&["start"], &["verbose"], &[])));
        assert!(!check("menu", &input(&["start"], &[], &["depth"])));
        assert!(check("menu", &input(&[], &["verbose"], &[])));
        assert!(!check("menu", &input(&["start", "hard"], &["fast"], &[])));
    }

    #[test]
    fn test_flag_keys_only_match_flags() {
        let dict = InputDict {
            path: strings(&["start"]),
            flags: HashMap::from([("seed".to_string(), Some(true))]),
            options: HashMap::new(),
        };
        assert!(!check("menu", &dict));
    }

    // --- access_path ---

    #[test]
    fn test_access_path_inclusive() {
        let pattern = CommandPath::from(["start", "-any"]);
        assert!(access_path(&strings(&["start", "hard"]), &pattern, true));
        assert!(!access_path(&strings(&["start"]), &pattern, true));
        assert!(!access_path(&strings(&["start", "hard", "x"]), &pattern, true));
        assert!(!access_path(&strings(&["stop", "hard"]), &pattern, true));
    }

    #[test]
    fn test_access_path_prefix() {
        let pattern = CommandPath(vec![
            PathSegment::one_of(["start", "begin"]),
            PathSegment::Any,
        ]);
        assert!(access_path(&strings(&["begin", "x", "y"]), &pattern, false));
        assert!(!access_path(&strings(&["other", "x"]), &pattern, false));
        assert!(!access_path(&strings(&["start", "x", "y"]), &CommandPath::from(["stop"]), false));
        assert!(access_path(&strings(&["anything"]), &CommandPath::default(), false));
    }

    #[test]
    fn test_access_path_input_running_out_still_matches() {
        let pattern = CommandPath::from(["start", "-any"]);
        assert!(access_path(&strings(&["start"]), &pattern, false));
        assert!(!access_path(&strings(&["stop"]), &pattern, false));
        assert!(!access_path(&strings(&["start"]), &pattern, true));
    }

    #[test]
    fn test_undeclared_flags_and_options_are_reported() {
        let mut basic = Reporter::new(WarningsLevel::Basic);
        let dict = input(&["start"], &["verbose"], &[]);
        assert!(!validate_commands_path(&mut basic, "menu", &dict, &config()).unwrap());
        assert_eq!(basic.diagnostics().len(), 1);
        assert_eq!(basic.diagnostics()[0].kind, IssueKind::InputValues);

        let mut strict = Reporter::new(WarningsLevel::Strict);
        let dict = input(&["start"], &[], &["depth"]);
        let result = validate_commands_path(&mut strict, "menu", &dict, &config());
        assert!(matches!(result, Err(ValidationError::InputValues(_))));
    }

    #[test]
    fn test_command_path_display() {
        let pattern = CommandPath(vec![
            PathSegment::from("start"),
            PathSegment::one_of(["a", "b"]),
            PathSegment::from("-any"),
        ]);
        assert_eq!(pattern.to_string(), "start {a|b} -any");
    }

    // --- Normalised path ---

    #[test]
    fn test_normalized_path() {
        let config = config();
        assert_eq!(
            get_normalized_path(&config, &strings(&["s", "hard"])),
            strings(&["start", "$level"])
        );
        assert_eq!(get_normalized_path(&config, &strings(&["nope", "x"])), Vec::<String>::new());
    }
}
