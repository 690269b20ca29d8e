//! The container contract and format selection
//!
//! [`Container`] is the one capability every format exposes: resolve a
//! [`Path`] to a string. [`load`] and [`load_file`] pick the JSON or YAML
//! implementation from a [`Format`].

use std::fmt;
use std::path::Path as FsPath;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::json::JsonContainer;
use crate::path::Path;
use crate::yaml::YamlContainer;

/// Read-only view of a parsed document, queried by path
///
/// Implementations own their document exclusively and never mutate it
/// after construction, so one container can serve lookups from many
/// threads.
pub trait Container: Send + Sync {
    /// Resolve `path` to a string value
    fn get_value_at_path(&self, path: &Path) -> Result<String>;

    /// The format this container was built from
    fn format(&self) -> Format;
}

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Env,
}

impl Format {
    /// Detect the format from a file extension
    pub fn from_path(path: impl AsRef<FsPath>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Env => "env",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "env" => Ok(Format::Env),
            other => Err(format!(
                "Unsupported format: {}. Use json, yaml, or env.",
                other
            )),
        }
    }
}

/// Build a container for `format` from raw bytes
pub fn load(format: Format, bytes: &[u8]) -> Result<Box<dyn Container>> {
    match format {
        Format::Json => Ok(Box::new(JsonContainer::from_slice(bytes)?)),
        Format::Yaml => Ok(Box::new(YamlContainer::from_slice(bytes)?)),
        Format::Env => Err(Error::parse(
            Format::Env,
            "environment containers are not built from bytes",
        )
        .with_help("Use EnvContainer::from_env(prefix) to read the process environment")),
    }
}

/// Read a JSON or YAML file, detecting the format from its extension
///
/// Files without a recognized extension are read as YAML, which also
/// accepts JSON input.
pub fn load_file(path: impl AsRef<FsPath>) -> Result<Box<dyn Container>> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| Error::io(display.clone(), e.to_string()))?;

    let format = Format::from_path(path).unwrap_or(Format::Yaml);
    log::debug!("loading {} as {}", display, format);

    load(format, &bytes).map_err(|e| e.in_file(display))
}
