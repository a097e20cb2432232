// src/core/command_system.rs

use log::{debug, info, warn};
use std::fmt;

use crate::{
    core::{
        diagnostics::{Diagnostic, ValidationError},
        history::{CommandHistory, HistoryNote},
        path_resolver::{self, CommandPath},
        processor,
    },
    models::{CommandNode, CommandsConfig, InputDict},
    settings::Settings,
};

/// A routed command implementation: receives the raw input and its parsed form.
pub type Handler = Box<dyn FnMut(&str, &InputDict)>;

/// Facade over the whole engine: settings, grammar, routing table and history.
pub struct CommandSystem {
    settings: Settings,
    config: Option<CommandsConfig>,
    routes: Vec<(CommandPath, Handler)>,
    history: CommandHistory,
}

impl fmt::Debug for CommandSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self.routes.iter().map(|(path, _)| path.to_string()).collect();
        f.debug_struct("CommandSystem")
            .field("settings", &self.settings)
            .field("config", &self.config)
            .field("routes", &routes)
            .field("history", &self.history)
            .finish()
    }
}

impl CommandSystem {
    /// A system with no grammar loaded and a history sized by `settings`.
    pub fn new(settings: Settings) -> Self {
        let history = CommandHistory::from_settings(&settings.history);
        Self {
            settings,
            config: None,
            routes: Vec::new(),
            history,
        }
    }

    pub fn with_config(mut self, config: CommandsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_history(mut self, history: CommandHistory) -> Self {
        self.history = history;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // --- Grammar ---

    pub fn is_config_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// Loads the grammar from a config file, replacing any loaded one.
    /// Returns the warnings collected on the way.
    pub fn load_config(&mut self, config_path: &str) -> Result<Vec<Diagnostic>, ValidationError> {
        let mut reporter = self.settings.reporter();
        let config = processor::load_config_with(&mut reporter, config_path)?;
        self.config = Some(config);
        Ok(reporter.take_diagnostics())
    }

    /// Installs an already built grammar, or unloads the current one.
    pub fn set_config(&mut self, config: Option<CommandsConfig>) {
        self.config = config;
    }

    pub fn config(&self) -> Option<&CommandsConfig> {
        self.config.as_ref()
    }

    // --- State ---

    pub fn current_state(&self) -> &str {
        &self.settings.current_state
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.settings.current_state = state.into();
        debug!("Current state is now '{}'", self.settings.current_state);
    }

    // --- Input ---

    pub fn process_input(&self, input_str: &str) -> Result<InputDict, ValidationError> {
        processor::process_input(&self.settings, self.config.as_ref(), input_str)
    }

    /// Checks an input against the grammar and the current state.
    /// Always `false` while no grammar is loaded.
    pub fn is_input_valid(&self, input_dict: &InputDict) -> Result<bool, ValidationError> {
        match &self.config {
            Some(config) => path_resolver::validate_input_dict(&self.settings, input_dict, config),
            None => {
                warn!("{}", t!("system.config_not_loaded"));
                Ok(false)
            }
        }
    }

    /// The canonical names of the commands the input's path selects.
    pub fn get_normalized_path(&self, input_dict: &InputDict) -> Vec<String> {
        match &self.config {
            Some(config) => path_resolver::get_normalized_path(config, &input_dict.path),
            None => {
                warn!("{}", t!("system.config_not_loaded"));
                Vec::new()
            }
        }
    }

    // --- Command listings ---

    fn positional_commands(&self) -> impl Iterator<Item = &CommandNode> {
        self.config
            .iter()
            .flat_map(|config| config.commands.iter())
            .filter(|command| command.command_type().is_positional())
    }

    /// Top-level words and fallbacks, whatever the state.
    pub fn get_all_commands(&self) -> Vec<&CommandNode> {
        if !self.is_config_loaded() {
            warn!("{}", t!("system.config_not_loaded"));
        }
        self.positional_commands().collect()
    }

    pub fn get_all_commands_str(&self) -> Vec<&str> {
        self.get_all_commands().into_iter().map(CommandNode::name).collect()
    }

    /// Top-level words and fallbacks reachable from the current state.
    pub fn get_available_commands(&self) -> Vec<&CommandNode> {
        let Some(config) = &self.config else {
            warn!("{}", t!("system.config_not_loaded"));
            return Vec::new();
        };
        let state = self.current_state();
        self.positional_commands()
            .filter(|command| config.is_reachable(command.name(), state))
            .collect()
    }

    pub fn get_available_commands_str(&self) -> Vec<&str> {
        self.get_available_commands()
            .into_iter()
            .map(CommandNode::name)
            .collect()
    }

    // --- Routing ---

    /// Adds a route. Returns `false` if `path` is already routed.
    pub fn register_command<F>(&mut self, path: CommandPath, handler: F) -> bool
    where
        F: FnMut(&str, &InputDict) + 'static,
    {
        if self.routes.iter().any(|(p, _)| *p == path) {
            return false;
        }
        debug!("Registering route '{}'", path);
        self.routes.push((path, Box::new(handler)));
        true
    }

    /// Replaces the handler of a route. Returns `false` if `path` is not routed.
    pub fn change_command<F>(&mut self, path: &CommandPath, handler: F) -> bool
    where
        F: FnMut(&str, &InputDict) + 'static,
    {
        match self.routes.iter_mut().find(|(p, _)| p == path) {
            Some(route) => {
                route.1 = Box::new(handler);
                true
            }
            None => false,
        }
    }

    /// Removes a route. Returns `false` if `path` is not routed.
    pub fn unload_command(&mut self, path: &CommandPath) -> bool {
        let before = self.routes.len();
        self.routes.retain(|(p, _)| p != path);
        self.routes.len() != before
    }

    pub fn get_command(&mut self, path: &CommandPath) -> Option<&mut Handler> {
        self.routes
            .iter_mut()
            .find(|(p, _)| p == path)
            .map(|(_, handler)| handler)
    }

    /// Runs the first route, in registration order, whose pattern is a prefix
    /// of `normalized_path`. With `tracking`, the input is written to the
    /// history first, whether a route runs or not.
    pub fn execute(
        &mut self,
        input_str: &str,
        input_dict: &InputDict,
        normalized_path: &[String],
        tracking: bool,
    ) -> bool {
        if tracking {
            self.write_history(input_str, input_dict.clone());
        }

        if normalized_path.is_empty() {
            info!("{}", t!("system.command_not_written"));
            return false;
        }

        let route = self
            .routes
            .iter_mut()
            .find(|(path, _)| path_resolver::access_path(normalized_path, path, false));

        match route {
            Some((path, handler)) => {
                info!("Routing '{}' to '{}'", input_str, path);
                handler(input_str, input_dict);
                true
            }
            None => {
                warn!("{}", format!(t!("system.command_not_implemented"), input = input_str));
                false
            }
        }
    }

    // --- History ---

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Returns `false` if the history is full and refuses new notes.
    pub fn write_history(&mut self, input_str: &str, input_dict: InputDict) -> bool {
        self.history.write(input_str, input_dict)
    }

    /// `0` is the newest note; larger indexes are clamped to the oldest.
    pub fn read_history(&self, index: usize) -> Option<&HistoryNote> {
        self.history.read(index)
    }

    pub fn get_history(&self) -> Vec<&HistoryNote> {
        self.history.notes().collect()
    }

    pub fn get_history_input(&self) -> Vec<&str> {
        self.history.inputs()
    }

    pub fn get_history_dict(&self) -> Vec<&InputDict> {
        self.history.dicts()
    }
}
