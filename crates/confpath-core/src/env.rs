//! Environment variables as a flat document
//!
//! The environment has no nesting, so a path is rendered to a single key:
//! field names as written, indices as `[N]`, joined with `.`. The path
//! `servers, 0, host` therefore reads the variable `<prefix>servers.[0].host`.
//!
//! The process environment is only read by [`EnvContainer::from_env`]; the
//! other constructors take an explicit source so lookups can be exercised
//! without touching global state.

use indexmap::IndexMap;

use crate::container::{Container, Format};
use crate::error::{Error, Result};
use crate::path::{Path, StepVisitor};

/// Renders a path to its flat key
#[derive(Default)]
struct KeyRenderer {
    parts: Vec<String>,
}

impl KeyRenderer {
    fn build(self) -> String {
        self.parts.join(".")
    }
}

impl<'p> StepVisitor<'p> for KeyRenderer {
    fn visit_field(&mut self, name: &'p str) {
        self.parts.push(name.to_string());
    }

    fn visit_index(&mut self, index: usize) {
        self.parts.push(format!("[{}]", index));
    }
}

/// Flat key a path resolves to in an environment container
pub fn render_key(path: &Path) -> String {
    let mut renderer = KeyRenderer::default();
    path.traverse(&mut renderer);
    renderer.build()
}

/// Variables sharing a prefix, with the prefix stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvContainer {
    prefix: String,
    vars: IndexMap<String, String>,
}

impl EnvContainer {
    /// Read the process environment
    ///
    /// Entries that are not valid Unicode are ignored unless their name
    /// starts with `prefix`, in which case they are rejected.
    pub fn from_env(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let mut pairs = Vec::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => pairs.push((key, value)),
                (Ok(key), Err(_)) if !key.starts_with(&prefix) => {}
                (Ok(key), Err(_)) => return Err(Error::malformed_entry(key)),
                (Err(key), _) => {
                    let lossy = key.to_string_lossy();
                    if lossy.starts_with(&prefix) {
                        return Err(Error::malformed_entry(lossy.into_owned()));
                    }
                }
            }
        }
        Self::from_vars(prefix, pairs)
    }

    /// Build from raw `KEY=VALUE` entries
    ///
    /// The key ends at the first `=`; the value may contain more.
    pub fn from_entries<I, S>(prefix: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs = entries
            .into_iter()
            .map(|entry| {
                let entry = entry.as_ref();
                entry
                    .split_once('=')
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .ok_or_else(|| Error::malformed_entry(entry))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_vars(prefix, pairs)
    }

    /// Build from already split `(key, value)` pairs
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = prefix.into();
        let mut stored = IndexMap::new();

        for (key, value) in vars {
            let Some(stripped) = key.as_ref().strip_prefix(prefix.as_str()) else {
                continue;
            };
            if stored.contains_key(stripped) {
                return Err(Error::duplicate_key(stripped, &prefix));
            }
            stored.insert(stripped.to_string(), value.into());
        }

        log::debug!(
            "collected {} environment variable(s) with prefix '{}'",
            stored.len(),
            prefix
        );

        Ok(Self {
            prefix,
            vars: stored,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Stored keys, prefix stripped, in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

impl Container for EnvContainer {
    fn get_value_at_path(&self, path: &Path) -> Result<String> {
        let key = render_key(path);
        let result = match self.vars.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::path_not_found(key.clone(), &self.prefix).with_path(path.to_string())),
        };
        log::trace!("env lookup {} as '{}' ok={}", path, key, result.is_ok());
        result
    }

    fn format(&self) -> Format {
        Format::Env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::path::{field, index};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_key() {
        assert_eq!(
            render_key(&Path::new([field("a"), index(0), field("b")])),
            "a.[0].b"
        );
        assert_eq!(render_key(&Path::new([index(2), index(10)])), "[2].[10]");
        assert_eq!(render_key(&Path::new([field("host")])), "host");
        assert_eq!(render_key(&Path::root()), "");
    }

    #[test]
    fn test_lookup_flattened_path() {
        let c = EnvContainer::from_entries(
            "SUPERAPP_",
            ["SUPERAPP_a.[0].b=fooo test value", "OTHER=ignored"],
        )
        .unwrap();

        assert_eq!(c.len(), 1);
        assert_eq!(c.prefix(), "SUPERAPP_");
        assert_eq!(
            c.get_value_at_path(&Path::new([field("a"), index(0), field("b")]))
                .unwrap(),
            "fooo test value"
        );
    }

    #[test]
    fn test_other_renderings_are_not_found() {
        let c = EnvContainer::from_vars("APP_", [("APP_a[0].b", "v"), ("APP_a.0.b", "w")])
            .unwrap();

        let err = c
            .get_value_at_path(&Path::new([field("a"), index(0), field("b")]))
            .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::PathNotFound {
                key: "a.[0].b".into()
            }
        );
        assert_eq!(err.path.as_deref(), Some("a[0].b"));
        assert!(err.help.unwrap().contains("APP_a.[0].b"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let c = EnvContainer::from_entries("", ["DSN=postgres://u:p@h/db?sslmode=require"])
            .unwrap();
        assert_eq!(
            c.get_value_at_path(&Path::new([field("DSN")])).unwrap(),
            "postgres://u:p@h/db?sslmode=require"
        );
    }

    #[test]
    fn test_malformed_entry() {
        let err = EnvContainer::from_entries("APP_", ["APP_ok=1", "NO_SEPARATOR"]).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MalformedEntry {
                entry: "NO_SEPARATOR".into()
            }
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = EnvContainer::from_entries("APP_", ["APP_host=a", "APP_host=b"]).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DuplicateKey {
                key: "host".into()
            }
        );
    }

    #[test]
    fn test_scalar_and_nested_keys_coexist() {
        let c = EnvContainer::from_vars("APP_", [("APP_db", "url"), ("APP_db.host", "h")]).unwrap();
        assert_eq!(c.get_value_at_path(&Path::new([field("db")])).unwrap(), "url");
        assert_eq!(
            c.get_value_at_path(&Path::new([field("db"), field("host")]))
                .unwrap(),
            "h"
        );
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["db", "db.host"]);
    }

    #[test]
    fn test_empty_path_reads_bare_prefix() {
        let c = EnvContainer::from_vars("APP_", [("APP_", "root")]).unwrap();
        assert_eq!(c.get_value_at_path(&Path::root()).unwrap(), "root");

        let empty = EnvContainer::from_vars("APP_", Vec::<(String, String)>::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.get_value_at_path(&Path::root()).is_err());
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("CONFPATH_ENV_TEST_db.[0].host", "from-process");

        let c = EnvContainer::from_env("CONFPATH_ENV_TEST_").unwrap();
        assert_eq!(
            c.get_value_at_path(&Path::new([field("db"), index(0), field("host")]))
                .unwrap(),
            "from-process"
        );
        assert_eq!(c.format(), Format::Env);

        std::env::remove_var("CONFPATH_ENV_TEST_db.[0].host");
    }
}
