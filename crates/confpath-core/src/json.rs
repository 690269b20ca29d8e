//! JSON documents
//!
//! A [`JsonContainer`] owns a parsed [`Node`] tree. Each lookup turns the
//! path into a chain of accessors, one per step, and applies them from the
//! root down.

use std::str::FromStr;

use crate::container::{Container, Format};
use crate::error::{Error, Result, SourceLocation};
use crate::node::{Node, NodeKind};
use crate::path::{Path, StepVisitor};

/// Resolves one step against a JSON node
#[derive(Debug, Clone, Copy, PartialEq)]
enum Accessor<'p> {
    Key(&'p str),
    Index(usize),
}

impl Accessor<'_> {
    fn access<'n>(&self, node: &'n Node) -> Result<&'n Node> {
        match *self {
            Accessor::Key(key) => match node {
                Node::Mapping(map) => map.get(key).ok_or_else(|| Error::key_not_found(key)),
                other => Err(Error::kind_mismatch(NodeKind::Mapping, other.kind())),
            },
            Accessor::Index(index) => match node {
                Node::Sequence(seq) => seq
                    .get(index)
                    .ok_or_else(|| Error::index_out_of_range(index, seq.len())),
                other => Err(Error::kind_mismatch(NodeKind::Sequence, other.kind())),
            },
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

fn parse_error(err: serde_json::Error) -> Error {
    let line = err.line();
    let column = err.column();
    let mut error = Error::parse(Format::Json, err.to_string());
    if line > 0 {
        error = error.with_source_location(SourceLocation {
            file: None,
            line: Some(line),
            column: Some(column),
        });
    }
    error
}

/// A parsed JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct JsonContainer {
    root: Node,
}

impl JsonContainer {
    /// Wrap an already built tree
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Parse a JSON document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Node = serde_json::from_slice(bytes).map_err(parse_error)?;
        log::debug!("parsed json document with {} root", root.kind());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<&Node> {
        if self.root.is_null() {
            return Err(Error::empty_document());
        }

        let mut node = &self.root;
        for (i, accessor) in accessor_chain(path).iter().enumerate() {
            node = accessor
                .access(node)
                .map_err(|e| e.with_path(path.display_prefix(i + 1)))?;
        }
        Ok(node)
    }
}

impl FromStr for JsonContainer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

impl Container for JsonContainer {
    fn get_value_at_path(&self, path: &Path) -> Result<String> {
        let result = self.resolve(path).and_then(|node| match node {
            Node::String(s) => Ok(s.clone()),
            other => Err(Error::not_a_string(other.kind()).with_path(path.to_string())),
        });
        log::trace!("json lookup {} ok={}", path, result.is_ok());
        result
    }

    fn format(&self) -> Format {
        Format::Json
    }
}
