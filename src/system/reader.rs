// src/system/reader.rs

use anyhow::Result;
use log::debug;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::diagnostics::{Gate, IssueKind, Reporter, ValidationError};

/// Parses the text of a config file into a mapping.
pub trait ConfigReader: Sync {
    fn parse(&self, content: &str) -> Result<Value>;
}

/// Plain JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl ConfigReader for JsonReader {
    fn parse(&self, content: &str) -> Result<Value> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Associates a file extension with the reader that handles it.
struct ReaderDefinition {
    extension: &'static str,
    /// Non-standard extensions are accepted with a lint warning.
    is_standard: bool,
    reader: &'static dyn ConfigReader,
}

/// Every config format this crate understands.
static READER_REGISTRY: &[ReaderDefinition] = &[
    ReaderDefinition {
        extension: "json",
        is_standard: true,
        reader: &JsonReader,
    },
    ReaderDefinition {
        extension: "json5",
        is_standard: false,
        reader: &JsonReader,
    },
];

fn find_reader(extension: &str) -> Option<&'static ReaderDefinition> {
    READER_REGISTRY
        .iter()
        .find(|def| def.extension.eq_ignore_ascii_case(extension))
}

/// Extensions accepted by `read_file`, without the dot.
pub fn supported_extensions() -> Vec<&'static str> {
    READER_REGISTRY.iter().map(|def| def.extension).collect()
}

/// Reads and parses a config file.
///
/// `~` and environment variables in `path` are expanded. A path that does
/// not lead to a readable, parsable file with a supported extension is a
/// `File` anomaly; when the reporter doesn't raise it, an empty mapping is
/// returned so validation can go on with defaults.
pub fn read_file(reporter: &mut Reporter, path: &str) -> Result<Value, ValidationError> {
    let empty = || Value::Object(Map::new());

    let expanded = match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            reporter.report(
                IssueKind::File,
                format!(t!("file.path_expand_failed"), path = path, error = e),
                t!("fix.defaults"),
            )?;
            return Ok(empty());
        }
    };
    let shown = dunce::simplified(&expanded).display().to_string();

    if !expanded.is_file() {
        reporter.report(
            IssueKind::File,
            format!(t!("file.not_exists"), path = shown),
            t!("fix.defaults"),
        )?;
        return Ok(empty());
    }

    let extension = extension_of(&expanded);
    let Some(definition) = find_reader(&extension) else {
        reporter.report(
            IssueKind::File,
            format!(t!("file.extension_unsupported"), extension = extension),
            t!("fix.defaults"),
        )?;
        return Ok(empty());
    };

    if !definition.is_standard {
        reporter.report_at(
            IssueKind::File,
            format!(t!("file.extension_compat"), extension = extension),
            t!("fix.accepting"),
            Gate::LINT,
        )?;
    }

    let content = match fs::read_to_string(&expanded) {
        Ok(content) => content,
        Err(e) => {
            reporter.report(
                IssueKind::File,
                format!(t!("file.read_failed"), path = shown, error = e),
                t!("fix.defaults"),
            )?;
            return Ok(empty());
        }
    };

    debug!("Parsing '{}' as {}", shown, definition.extension);
    match definition.reader.parse(&content) {
        Ok(value) => Ok(value),
        Err(e) => {
            reporter.report(
                IssueKind::File,
                format!(t!("file.parse_failed"), path = shown, error = e),
                t!("fix.defaults"),
            )?;
            Ok(empty())
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}
