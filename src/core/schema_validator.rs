// src/core/schema_validator.rs

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    constants::{
        BASE_STATE, EMPTY_NAME_PREFIX, FALLBACK_MARKER, LATEST_VERSION, RESERVED_STATES,
        SUPPORTED_VERSIONS,
    },
    core::diagnostics::{Gate, IssueKind, Reporter, ValidationError},
    models::{CommandType, ValidatedCommand, ValidatedConfig, upsert},
};

lazy_static! {
    /// Names generated for empty keys. Left untouched on re-validation.
    static ref PLACEHOLDER_NAME: Regex =
        Regex::new(&format!(r"^{}\d+$", regex::escape(EMPTY_NAME_PREFIX)))
            .expect("placeholder pattern is valid");
    /// The `__name__` shape reserved for internal states.
    static ref INTERNAL_STATE_NAME: Regex =
        Regex::new(r"^__.+__$").expect("internal state pattern is valid");
}

/// What a name identifies, which decides the characters it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Command,
    Fallback,
    State,
}

/// A pending change to a name, applied once the scan is over.
#[derive(Debug)]
struct Edit {
    index: usize,
    len: usize,
    replacement: &'static str,
}

impl Edit {
    fn remove(index: usize) -> Self {
        Self {
            index,
            len: 1,
            replacement: "",
        }
    }
}

type Validated<T> = Result<T, ValidationError>;

/// Turns an untrusted config mapping into a `ValidatedConfig`.
///
/// Every anomaly goes through the borrowed `Reporter`: depending on its level
/// the anomaly is corrected silently, corrected with a warning, or aborts the
/// whole validation.
#[derive(Debug)]
pub struct SchemaValidator<'r> {
    reporter: &'r mut Reporter,
    empty_name_index: usize,
    used_aliases: Vec<String>,
}

impl<'r> SchemaValidator<'r> {
    pub fn new(reporter: &'r mut Reporter) -> Self {
        Self {
            reporter,
            empty_name_index: 0,
            used_aliases: Vec::new(),
        }
    }

    /// Validates version, commands and states, in that order.
    pub fn validate_config(&mut self, config: &Value) -> Validated<ValidatedConfig> {
        debug!("Validating config");
        let version = self.validate_version(config)?;
        let commands = self.validate_commands(config)?;
        let states = self.validate_states(config, &commands)?;

        Ok(ValidatedConfig {
            version,
            states,
            commands,
        })
    }

    pub fn validate_version(&mut self, config: &Value) -> Validated<i64> {
        let Some(raw) = config.get("version") else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                t!("schema.version.missing").to_string(),
                t!("fix.latest"),
            )?;
            return Ok(LATEST_VERSION);
        };

        match raw.as_i64() {
            Some(version) if SUPPORTED_VERSIONS.contains(&version) => Ok(version),
            _ => {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.version.invalid"), version = raw),
                    t!("fix.latest"),
                )?;
                Ok(LATEST_VERSION)
            }
        }
    }

    /// Returns `None` when the entry has no usable type and must be dropped.
    pub fn validate_command_type(
        &mut self,
        name: &str,
        command: &Map<String, Value>,
    ) -> Validated<Option<CommandType>> {
        let Some(raw) = command.get("type") else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                format!(t!("schema.command.type_missing"), name = name),
                t!("fix.skipping"),
            )?;
            return Ok(None);
        };

        let command_type = raw.as_str().and_then(CommandType::from_literal);
        if command_type.is_none() {
            self.reporter.report(
                IssueKind::ConfigValues,
                format!(t!("schema.command.type_invalid"), name = name, kind = raw),
                t!("fix.skipping"),
            )?;
        }
        Ok(command_type)
    }

    /// Validates the `aliases` list itself. Name rules and uniqueness across
    /// the forest are enforced later by `register_aliases`.
    pub fn validate_command_aliases(&mut self, command: &Map<String, Value>) -> Validated<Vec<String>> {
        let Some(raw) = command.get("aliases") else {
            return Ok(Vec::new());
        };
        let Some(list) = raw.as_array() else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                t!("schema.command.aliases_invalid").to_string(),
                t!("fix.defaults"),
            )?;
            return Ok(Vec::new());
        };

        let mut aliases: Vec<String> = Vec::with_capacity(list.len());
        for item in list {
            let alias = match item.as_str() {
                Some(s) => s.to_string(),
                None => {
                    self.reporter.report(
                        IssueKind::ConfigValues,
                        format!(t!("schema.command.alias_not_string"), alias = item),
                        t!("fix.casting"),
                    )?;
                    item.to_string()
                }
            };

            if aliases.contains(&alias) {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.command.alias_duplicated"), alias = alias),
                    t!("fix.skipping"),
                )?;
                continue;
            }
            aliases.push(alias);
        }
        Ok(aliases)
    }

    /// The `default` field. Absence is never an anomaly; a flag default must
    /// be a boolean or null.
    pub fn validate_command_default(
        &mut self,
        name: &str,
        command_type: CommandType,
        command: &Map<String, Value>,
    ) -> Validated<Option<Value>> {
        let default = command.get("default").cloned();

        if command_type != CommandType::Flag {
            return Ok(default);
        }
        match default {
            Some(value) if !(value.is_boolean() || value.is_null()) => {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.command.flag_default_invalid"), name = name, value = value),
                    t!("fix.defaults"),
                )?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Validates one command body. `name` is its already validated key.
    /// Returns `None` when the command must be dropped.
    pub fn validate_command(&mut self, name: &str, raw: &Value) -> Validated<Option<ValidatedCommand>> {
        let Some(command) = raw.as_object() else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                format!(t!("schema.command.invalid"), name = name),
                t!("fix.skipping"),
            )?;
            return Ok(None);
        };

        let Some(command_type) = self.validate_command_type(name, command)? else {
            return Ok(None);
        };

        let denied = [
            ("aliases", command_type.allows_aliases()),
            ("default", command_type.allows_default()),
            ("children", command_type.allows_children()),
        ];
        for (field, allowed) in denied {
            if !allowed && command.contains_key(field) {
                self.reporter.report(
                    IssueKind::ConfigStructure,
                    format!(
                        t!("schema.command.field_denied"),
                        name = name,
                        kind = command_type,
                        field = field
                    ),
                    t!("fix.skipping"),
                )?;
                return Ok(None);
            }
        }

        let aliases = if command_type.allows_aliases() {
            let aliases = self.validate_command_aliases(command)?;
            self.register_aliases(name, aliases)?
        } else {
            Vec::new()
        };

        let default = if command_type.allows_default() {
            self.validate_command_default(name, command_type, command)?
        } else {
            None
        };

        let mut children = Vec::new();
        let raw_children = if command_type.allows_children() {
            command.get("children")
        } else {
            None
        };
        if let Some(raw_children) = raw_children {
            match raw_children.as_object() {
                Some(map) => {
                    for (key, value) in map {
                        if let Some((child_name, child)) = self.validate_entry(key, value)? {
                            upsert(&mut children, child_name, child);
                        }
                    }
                    if children.is_empty() {
                        self.reporter.report(
                            IssueKind::ConfigValues,
                            format!(t!("schema.command.children_empty"), name = name),
                            t!("fix.removing"),
                        )?;
                    }
                }
                None => {
                    self.reporter.report(
                        IssueKind::ConfigStructure,
                        format!(t!("schema.command.children_invalid"), name = name),
                        t!("fix.defaults"),
                    )?;
                }
            }
        }

        Ok(Some(ValidatedCommand {
            command_type,
            aliases,
            default,
            children,
        }))
    }

    /// Validates a `key: body` pair of a `commands` or `children` mapping.
    fn validate_entry(&mut self, key: &str, raw: &Value) -> Validated<Option<(String, ValidatedCommand)>> {
        let is_fallback = raw.get("type").and_then(Value::as_str) == Some("fallback");
        let kind = if is_fallback {
            NameKind::Fallback
        } else {
            NameKind::Command
        };

        let name = self.validate_name(key, kind)?;
        trace!("Validating command '{}' (key '{}')", name, key);
        Ok(self.validate_command(&name, raw)?.map(|command| (name, command)))
    }

    /// Applies name rules to `aliases` and keeps each alias unique across the
    /// whole forest. An alias equal to its own command name is dropped.
    fn register_aliases(&mut self, name: &str, aliases: Vec<String>) -> Validated<Vec<String>> {
        let mut accepted = Vec::with_capacity(aliases.len());

        for alias in aliases {
            let alias = self.validate_name(&alias, NameKind::Command)?;

            if self.used_aliases.contains(&alias) {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.command.alias_duplicated"), alias = alias),
                    t!("fix.removing"),
                )?;
            } else if alias == name {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.command.alias_redundant"), alias = alias),
                    t!("fix.removing"),
                )?;
            } else {
                self.used_aliases.push(alias.clone());
                accepted.push(alias);
            }
        }
        Ok(accepted)
    }

    /// Corrects an identifier.
    ///
    /// Empty names become `command+N`. Otherwise the name is scanned once:
    /// leading `-` and special characters are marked for removal (state
    /// underscore runs for normalisation to `__`), and the edits are applied
    /// in reverse order at the end. Validating a validated name changes nothing.
    pub fn validate_name(&mut self, name: &str, kind: NameKind) -> Validated<String> {
        if PLACEHOLDER_NAME.is_match(name) {
            return Ok(name.to_string());
        }
        if name.trim().is_empty() {
            return self.placeholder_name();
        }

        let chars: Vec<char> = name.chars().collect();
        let mut edits: Vec<Edit> = Vec::new();
        let mut found_alphanumeric = false;
        let mut found_marker = false;
        let mut i = 0;

        while let Some(&c) = chars.get(i) {
            if c.is_alphanumeric() {
                found_alphanumeric = true;
            } else if c == '-' {
                if !found_alphanumeric {
                    self.reporter.report(
                        IssueKind::ConfigValues,
                        format!(t!("schema.name.starts_invalid"), name = name),
                        t!("fix.removing"),
                    )?;
                    edits.push(Edit::remove(i));
                }
            } else if kind == NameKind::State && c == '_' {
                let start = i;
                while chars.get(i) == Some(&'_') {
                    i += 1;
                }
                let length = i - start;
                if length != 2 {
                    self.reporter.report(
                        IssueKind::ConfigValues,
                        format!(t!("schema.name.state_underscores"), name = name, length = length),
                        t!("fix.defaults"),
                    )?;
                    edits.push(Edit {
                        index: start,
                        len: length,
                        replacement: "__",
                    });
                }
                continue;
            } else if kind == NameKind::State && matches!(c, ':' | '/') {
                // Separators allowed in state names.
            } else if kind == NameKind::Fallback && c == FALLBACK_MARKER {
                if i == 0 {
                    found_marker = true;
                } else {
                    let message = if found_marker {
                        format!(t!("schema.name.dollar_overload"), name = name)
                    } else {
                        format!(t!("schema.name.dollar_misposition"), name = name)
                    };
                    self.reporter
                        .report(IssueKind::ConfigValues, message, t!("fix.removing"))?;
                    found_marker = true;
                    edits.push(Edit::remove(i));
                }
            } else if c == ' ' || c.is_ascii_punctuation() {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.name.special"), name = name, character = c),
                    t!("fix.removing"),
                )?;
                edits.push(Edit::remove(i));
            } else {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.name.unknown_character"), name = name, character = c),
                    t!("fix.accepting"),
                )?;
            }
            i += 1;
        }

        if kind == NameKind::Fallback && !found_marker {
            self.reporter.report_at(
                IssueKind::ConfigValues,
                format!(t!("schema.name.dollar_missing"), name = name),
                t!("fix.none"),
                Gate::LINT,
            )?;
        }

        let mut result = chars;
        for edit in edits.iter().rev() {
            let end = (edit.index + edit.len).min(result.len());
            result.splice(edit.index.min(end)..end, edit.replacement.chars());
        }

        let result: String = result.into_iter().collect();
        if result.is_empty() {
            // Everything was removed.
            return self.placeholder_name();
        }
        Ok(result)
    }

    fn placeholder_name(&mut self) -> Validated<String> {
        let placeholder = format!("{}{}", EMPTY_NAME_PREFIX, self.empty_name_index);
        self.reporter.report(
            IssueKind::ConfigValues,
            t!("schema.name.empty").to_string(),
            t!("fix.renaming"),
        )?;
        self.empty_name_index += 1;
        Ok(placeholder)
    }

    /// Validates the `commands` mapping. Alias uniqueness is tracked per call.
    pub fn validate_commands(&mut self, config: &Value) -> Validated<Vec<(String, ValidatedCommand)>> {
        self.used_aliases.clear();

        let Some(raw) = config.get("commands") else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                t!("schema.commands.missing").to_string(),
                t!("fix.defaults"),
            )?;
            return Ok(Vec::new());
        };
        let Some(map) = raw.as_object() else {
            self.reporter.report(
                IssueKind::ConfigStructure,
                t!("schema.commands.invalid").to_string(),
                t!("fix.defaults"),
            )?;
            return Ok(Vec::new());
        };

        let mut commands = Vec::with_capacity(map.len());
        for (key, value) in map {
            if let Some((name, command)) = self.validate_entry(key, value)? {
                upsert(&mut commands, name, command);
            }
        }
        debug!("Validated {} top-level commands", commands.len());
        Ok(commands)
    }

    /// Validates the `states` mapping against the validated `commands`.
    ///
    /// Without usable states, a single `__base__` state lists every command
    /// key of the forest, depth first.
    pub fn validate_states(
        &mut self,
        config: &Value,
        commands: &[(String, ValidatedCommand)],
    ) -> Validated<Vec<(String, Vec<String>)>> {
        let mut known = Vec::new();
        collect_keys(commands, &mut known);

        let map = match config.get("states") {
            None => {
                self.reporter.report(
                    IssueKind::ConfigStructure,
                    t!("schema.states.missing").to_string(),
                    t!("fix.defaults"),
                )?;
                None
            }
            Some(raw) => {
                let map = raw.as_object();
                if map.is_none() {
                    self.reporter.report(
                        IssueKind::ConfigStructure,
                        t!("schema.states.invalid").to_string(),
                        t!("fix.defaults"),
                    )?;
                }
                map
            }
        };
        let Some(map) = map else {
            return Ok(vec![(BASE_STATE.to_string(), known)]);
        };

        let mut states: Vec<(String, Vec<String>)> = Vec::with_capacity(map.len());
        for (raw_name, raw_commands) in map {
            let mut name = self.validate_name(raw_name, NameKind::State)?;

            if INTERNAL_STATE_NAME.is_match(&name) && !RESERVED_STATES.contains(&name.as_str()) {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.state.internal_name"), name = name),
                    t!("fix.renaming"),
                )?;
                name = name
                    .strip_prefix("__")
                    .and_then(|n| n.strip_suffix("__"))
                    .unwrap_or(&name)
                    .to_string();
            }

            let listed = match raw_commands.as_array() {
                Some(list) => self.validate_state_commands(&name, list, &known)?,
                None => {
                    self.reporter.report(
                        IssueKind::ConfigStructure,
                        format!(t!("schema.state.commands_invalid"), name = name),
                        t!("fix.defaults"),
                    )?;
                    Vec::new()
                }
            };
            upsert(&mut states, name, listed);
        }
        Ok(states)
    }

    fn validate_state_commands(
        &mut self,
        state: &str,
        list: &[Value],
        known: &[String],
    ) -> Validated<Vec<String>> {
        let mut listed: Vec<String> = Vec::with_capacity(list.len());

        for item in list {
            let raw = match item.as_str() {
                Some(s) => s.to_string(),
                None => {
                    self.reporter.report(
                        IssueKind::ConfigValues,
                        format!(t!("schema.state.name_not_string"), state = state, name = item),
                        t!("fix.casting"),
                    )?;
                    item.to_string()
                }
            };

            let kind = if raw.starts_with(FALLBACK_MARKER) {
                NameKind::Fallback
            } else {
                NameKind::Command
            };
            let name = self.validate_name(&raw, kind)?;

            if !known.contains(&name) {
                self.reporter.report(
                    IssueKind::ConfigValues,
                    format!(t!("schema.state.unknown_command"), state = state, name = name),
                    t!("fix.skipping"),
                )?;
            } else if !listed.contains(&name) {
                listed.push(name);
            }
        }
        Ok(listed)
    }
}

/// Every command key of the forest, depth first, without repeats.
fn collect_keys(commands: &[(String, ValidatedCommand)], keys: &mut Vec<String>) {
    for (name, command) in commands {
        if !keys.contains(name) {
            keys.push(name.clone());
        }
        collect_keys(&command.children, keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::WarningsLevel;
    use serde_json::json;

    fn basic() -> Reporter {
        Reporter::new(WarningsLevel::Basic)
    }

    fn all_aliases(commands: &[(String, ValidatedCommand)], out: &mut Vec<String>) {
        for (_, command) in commands {
            out.extend(command.aliases.iter().cloned());
            all_aliases(&command.children, out);
        }
    }

    // --- Names ---

    #[test]
    fn test_empty_names_get_numbered_placeholders() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_name("", NameKind::Command).unwrap(), "command+0");
        assert_eq!(validator.validate_name("   ", NameKind::Command).unwrap(), "command+1");
        assert_eq!(validator.validate_name("command+1", NameKind::Command).unwrap(), "command+1");
        assert_eq!(reporter.diagnostics().len(), 2);
    }

    #[test]
    fn test_name_corrections() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_name("--start", NameKind::Command).unwrap(), "start");
        assert_eq!(validator.validate_name("dry-run", NameKind::Command).unwrap(), "dry-run");
        assert_eq!(validator.validate_name("he llo!", NameKind::Command).unwrap(), "hello");
        assert_eq!(validator.validate_name("my_cmd", NameKind::Command).unwrap(), "mycmd");
        assert_eq!(validator.validate_name("!!", NameKind::Command).unwrap(), "command+0");
    }

    #[test]
    fn test_state_name_rules() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_name("__base__", NameKind::State).unwrap(), "__base__");
        assert_eq!(validator.validate_name("a_b", NameKind::State).unwrap(), "a__b");
        assert_eq!(validator.validate_name("___x____", NameKind::State).unwrap(), "__x__");
        assert_eq!(
            validator.validate_name("menu:main/sub", NameKind::State).unwrap(),
            "menu:main/sub"
        );
        assert_eq!(reporter.diagnostics().len(), 3);
    }

    #[test]
    fn test_fallback_marker_rules() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_name("$name", NameKind::Fallback).unwrap(), "$name");
        assert_eq!(validator.validate_name("$na$me", NameKind::Fallback).unwrap(), "$name");
        assert_eq!(validator.validate_name("na$me", NameKind::Fallback).unwrap(), "name");
        assert_eq!(validator.validate_name("$name", NameKind::Command).unwrap(), "name");
    }

    #[test]
    fn test_missing_marker_is_a_lint_even_when_strict() {
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_name("value", NameKind::Fallback).unwrap(), "value");
        assert_eq!(reporter.diagnostics().len(), 1);
    }

    #[test]
    fn test_validate_name_is_idempotent() {
        let samples = [
            ("", NameKind::Command),
            ("-x", NameKind::Command),
            ("a b.c", NameKind::Command),
            ("naïve", NameKind::Command),
            ("___s", NameKind::State),
            ("__init__", NameKind::State),
            ("x$y$z", NameKind::Fallback),
            ("$ok", NameKind::Fallback),
            ("-", NameKind::Command),
        ];
        let mut reporter = Reporter::new(WarningsLevel::Ignore);
        let mut validator = SchemaValidator::new(&mut reporter);
        for (name, kind) in samples {
            let once = validator.validate_name(name, kind).unwrap();
            let twice = validator.validate_name(&once, kind).unwrap();
            assert_eq!(once, twice, "name {:?} is not stable", name);
        }
    }

    #[test]
    fn test_strict_raises_on_first_name_anomaly() {
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        let mut validator = SchemaValidator::new(&mut reporter);
        let result = validator.validate_name("bad name", NameKind::Command);
        assert!(matches!(result, Err(ValidationError::ConfigValues(_))));
    }

    // --- Version ---

    #[test]
    fn test_version() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert_eq!(validator.validate_version(&json!({"version": 1})).unwrap(), 1);
        assert_eq!(validator.validate_version(&json!({"version": 7})).unwrap(), 1);
        assert_eq!(validator.validate_version(&json!({"version": "1"})).unwrap(), 1);
        assert_eq!(validator.validate_version(&json!({})).unwrap(), 1);
        let kinds: Vec<IssueKind> = reporter.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::ConfigValues, IssueKind::ConfigValues, IssueKind::ConfigStructure]
        );
    }

    #[test]
    fn test_strict_missing_version_is_structural() {
        let mut reporter = Reporter::new(WarningsLevel::Strict);
        let mut validator = SchemaValidator::new(&mut reporter);
        let result = validator.validate_version(&json!({"commands": {}}));
        assert!(matches!(result, Err(ValidationError::ConfigStructure(_))));
    }

    // --- Commands ---

    #[test]
    fn test_command_field_rules() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({"commands": {
            "ok": {"type": "word", "aliases": ["o"]},
            "no_type": {"aliases": []},
            "bad_type": {"type": "verb"},
            "fb": {"type": "fallback", "aliases": ["x"]},
            "w": {"type": "word", "default": 1},
            "f": {"type": "flag", "children": {}},
            "not_an_object": 5
        }});
        let commands = validator.validate_commands(&config).unwrap();
        let names: Vec<&str> = commands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
        assert!(reporter.diagnostics().len() >= 6);
    }

    #[test]
    fn test_aliases_unique_across_forest() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({"commands": {
            "start": {"type": "word", "aliases": ["s", "start", "s", 5], "children": {
                "fast": {"type": "flag", "aliases": ["s", "f"]}
            }},
            "stop": {"type": "word", "aliases": ["f", "halt"]}
        }});
        let commands = validator.validate_commands(&config).unwrap();

        let start = &commands[0].1;
        assert_eq!(start.aliases, vec!["s".to_string(), "5".to_string()]);
        assert_eq!(start.children[0].1.aliases, vec!["f".to_string()]);
        assert_eq!(commands[1].1.aliases, vec!["halt".to_string()]);

        let mut aliases = Vec::new();
        all_aliases(&commands, &mut aliases);
        let mut deduped = aliases.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(aliases.len(), deduped.len());
    }

    #[test]
    fn test_flag_default_must_be_boolean() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({"commands": {
            "v": {"type": "flag", "default": "yes"},
            "q": {"type": "flag", "default": false}
        }});
        let commands = validator.validate_commands(&config).unwrap();
        assert_eq!(commands[0].1.default, None);
        assert_eq!(commands[1].1.default, Some(json!(false)));
        assert_eq!(reporter.diagnostics().len(), 1);
    }

    #[test]
    fn test_children_are_validated_recursively() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({"commands": {
            "set": {"type": "word", "children": {
                "$value": {"type": "fallback", "default": "1"},
                "junk": {"type": "nope"}
            }},
            "empty": {"type": "word", "children": {}},
            "broken": {"type": "word", "children": []}
        }});
        let commands = validator.validate_commands(&config).unwrap();
        assert_eq!(commands.len(), 3);
        let children = &commands[0].1.children;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, "$value");
        assert_eq!(children[0].1.default, Some(json!("1")));
        assert!(commands[1].1.children.is_empty());
        assert!(commands[2].1.children.is_empty());
    }

    #[test]
    fn test_missing_commands_is_empty() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        assert!(validator.validate_commands(&json!({})).unwrap().is_empty());
        assert!(validator.validate_commands(&json!({"commands": []})).unwrap().is_empty());
        assert_eq!(reporter.diagnostics().len(), 2);
    }

    // --- States ---

    #[test]
    fn test_missing_states_default_to_base_with_every_key() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({"version": 1, "commands": {
            "a": {"type": "word", "children": {"b": {"type": "word"}}},
            "c": {"type": "word"}
        }});
        let validated = validator.validate_config(&config).unwrap();
        assert_eq!(
            validated.states,
            vec![(
                "__base__".to_string(),
                vec!["a".to_string(), "b".to_string(), "c".to_string()]
            )]
        );
    }

    #[test]
    fn test_state_validation() {
        let mut reporter = basic();
        let mut validator = SchemaValidator::new(&mut reporter);
        let config = json!({
            "version": 1,
            "commands": {
                "start": {"type": "word"},
                "$name": {"type": "fallback"}
            },
            "states": {
                "menu": ["start", "quit", "$name", "start"],
                "__game__": ["start"],
                "broken": "start"
            }
        });
        let validated = validator.validate_config(&config).unwrap();
        assert_eq!(
            validated.states,
            vec![
                ("menu".to_string(), vec!["start".to_string(), "$name".to_string()]),
                ("game".to_string(), vec!["start".to_string()]),
                ("broken".to_string(), vec![]),
            ]
        );
    }
}
