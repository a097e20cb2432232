// src/constants.rs

/// Config versions this crate knows how to read. The last one is the latest.
pub const SUPPORTED_VERSIONS: &[i64] = &[1];

/// The version substituted when a config omits or mangles its own.
pub const LATEST_VERSION: i64 = 1;

/// Internal state that is always reachable, whatever the current state is.
pub const BASE_STATE: &str = "__base__";

/// Internal state a fresh `Settings` starts in.
pub const INIT_STATE: &str = "__init__";

/// The only state names allowed to use the `__name__` internal format.
pub const RESERVED_STATES: &[&str] = &[BASE_STATE, INIT_STATE];

/// Wildcard segment in a routing path; matches any single input segment.
pub const ANY_SEGMENT: &str = "-any";

/// Marker that opens the name of a fallback command.
pub const FALLBACK_MARKER: char = '$';

/// Prefix of the placeholder names given to empty command keys.
pub const EMPTY_NAME_PREFIX: &str = "command+";

/// Default number of notes kept in the command history.
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Name of the settings file looked up in the user's config directory.
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Directory (inside the system config dir) holding `SETTINGS_FILENAME`.
pub const APP_CONFIG_DIR: &str = "cmdsys";
