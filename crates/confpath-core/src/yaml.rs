//! YAML documents
//!
//! The parsed stream is kept as a document wrapper: a list of documents
//! that must hold exactly one entry before any step is applied. Tags are
//! looked through and aliases are resolved by the parser. A `<<` key is an
//! ordinary key; merges are not expanded.

use std::str::FromStr;

use serde::Deserialize;
use serde_yaml::Value;

use crate::container::{Container, Format};
use crate::error::{Error, Result, SourceLocation};
use crate::node::NodeKind;
use crate::path::{Path, StepVisitor};

/// Resolves one step against a YAML node
#[derive(Debug, Clone, Copy, PartialEq)]
enum Accessor<'p> {
    Key(&'p str),
    Index(usize),
}

impl Accessor<'_> {
    fn access<'n>(&self, node: &'n Value) -> Result<&'n Value> {
        match (*self, untag(node)) {
            (Accessor::Key(key), Value::Mapping(map)) => map
                .iter()
                .find(|(k, _)| key_matches(k, key))
                .map(|(_, v)| v)
                .ok_or_else(|| Error::key_not_found(key)),
            (Accessor::Key(_), other) => {
                Err(Error::kind_mismatch(NodeKind::Mapping, kind_of(other)))
            }
            (Accessor::Index(index), Value::Sequence(seq)) => seq
                .get(index)
                .ok_or_else(|| Error::index_out_of_range(index, seq.len())),
            (Accessor::Index(_), other) => {
                Err(Error::kind_mismatch(NodeKind::Sequence, kind_of(other)))
            }
        }
    }
}

#[derive(Default)]
struct ChainBuilder<'p> {
    accessors: Vec<Accessor<'p>>,
}

impl<'p> StepVisitor<'p> for ChainBuilder<'p> {
    fn visit_field(&mut self, name: &'p str) {
        self.accessors.push(Accessor::Key(name));
    }

    fn visit_index(&mut self, index: usize) {
        self.accessors.push(Accessor::Index(index));
    }
}

fn accessor_chain(path: &Path) -> Vec<Accessor<'_>> {
    let mut builder = ChainBuilder::default();
    path.traverse(&mut builder);
    builder.accessors
}

/// Strip any number of tags
fn untag(mut value: &Value) -> &Value {
    while let Value::Tagged(tagged) = value {
        value = &tagged.value;
    }
    value
}

fn kind_of(value: &Value) -> NodeKind {
    match value {
        Value::Null => NodeKind::Null,
        Value::Bool(_) => NodeKind::Bool,
        Value::Number(_) => NodeKind::Number,
        Value::String(_) => NodeKind::String,
        Value::Sequence(_) => NodeKind::Sequence,
        Value::Mapping(_) => NodeKind::Mapping,
        Value::Tagged(tagged) => kind_of(&tagged.value),
    }
}

/// Only string keys can be named by a field step
fn key_matches(key: &Value, name: &str) -> bool {
    matches!(untag(key), Value::String(s) if s == name)
}

fn parse_error(err: serde_yaml::Error) -> Error {
    let location = err.location().map(|loc| SourceLocation {
        file: None,
        line: Some(loc.line()),
        column: Some(loc.column()),
    });
    let error = Error::parse(Format::Yaml, err.to_string());
    match location {
        Some(loc) => error.with_source_location(loc),
        None => error,
    }
}

/// A parsed YAML stream
#[derive(Debug, Clone, PartialEq)]
pub struct YamlContainer {
    documents: Vec<Value>,
}

impl YamlContainer {
    /// Wrap already parsed documents
    pub fn from_documents(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    /// Parse a YAML stream from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_slice(bytes) {
            documents.push(Value::deserialize(document).map_err(parse_error)?);
        }
        log::debug!("parsed yaml stream with {} document(s)", documents.len());
        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Unwrap the document wrapper to its single root
    fn root(&self) -> Result<&Value> {
        match self.documents.as_slice() {
            [] => Err(Error::empty_document()),
            [root] if untag(root).is_null() => Err(Error::empty_document()),
            [root] => Ok(root),
            many => Err(Error::malformed_document(many.len())),
        }
    }

    fn resolve(&self, path: &Path) -> Result<&Value> {
        let mut node = self.root()?;
        for (i, accessor) in accessor_chain(path).iter().enumerate() {
            node = accessor
                .access(node)
                .map_err(|e| e.with_path(path.display_prefix(i + 1)))?;
        }
        Ok(node)
    }
}

impl FromStr for YamlContainer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

impl Container for YamlContainer {
    fn get_value_at_path(&self, path: &Path) -> Result<String> {
        let result = self.resolve(path).and_then(|node| match untag(node) {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::not_a_string(kind_of(other)).with_path(path.to_string())),
        });
        log::trace!("yaml lookup {} ok={}", path, result.is_ok());
        result
    }

    fn format(&self) -> Format {
        Format::Yaml
    }
}
