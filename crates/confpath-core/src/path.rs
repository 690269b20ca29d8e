//! Format-independent paths
//!
//! A [`Path`] is an ordered list of [`PathStep`]s. It knows nothing about
//! storage formats: each container walks it through a [`StepVisitor`] and
//! builds whatever accessor it needs.
//!
//! ```rust
//! use confpath_core::{field, index, Path};
//!
//! let path = Path::new([field("servers"), index(0), field("host")]);
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.to_string(), "servers[0].host");
//! ```

use std::fmt;

/// A single step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Select a value by key from a mapping
    Field(String),
    /// Select a value by position from a sequence
    Index(usize),
}

impl PathStep {
    /// Create a named-field step
    pub fn field(name: impl Into<String>) -> Self {
        PathStep::Field(name.into())
    }

    /// Create an indexed-element step
    pub fn index(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// Shorthand for [`PathStep::field`]
pub fn field(name: impl Into<String>) -> PathStep {
    PathStep::field(name)
}

/// Shorthand for [`PathStep::index`]
pub fn index(index: usize) -> PathStep {
    PathStep::index(index)
}

/// Receives the steps of a path in order.
///
/// Implement this to teach a new format how to interpret a [`Path`]. Field
/// names are borrowed from the path for `'p`, so visitors can keep them.
pub trait StepVisitor<'p> {
    fn visit_field(&mut self, name: &'p str);

    fn visit_index(&mut self, index: usize);
}

/// Ordered, immutable sequence of steps from a document root to a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Build a path from zero or more steps
    pub fn new(steps: impl IntoIterator<Item = PathStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// The empty path, which resolves to the document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Drive `visitor` over every step, left to right
    pub fn traverse<'p, V: StepVisitor<'p> + ?Sized>(&'p self, visitor: &mut V) {
        for step in &self.steps {
            match step {
                PathStep::Field(name) => visitor.visit_field(name),
                PathStep::Index(index) => visitor.visit_index(*index),
            }
        }
    }

    /// Diagnostic rendering of the first `len` steps
    pub(crate) fn display_prefix(&self, len: usize) -> String {
        let prefix = Path {
            steps: self.steps[..len.min(self.steps.len())].to_vec(),
        };
        prefix.to_string()
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Field(name) => write!(f, ".{}", name)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl<'p> StepVisitor<'p> for Recorder {
        fn visit_field(&mut self, name: &'p str) {
            self.seen.push(format!("field:{}", name));
        }

        fn visit_index(&mut self, index: usize) {
            self.seen.push(format!("index:{}", index));
        }
    }

    #[test]
    fn test_traverse_visits_in_order() {
        let path = Path::new([field("a"), index(0), field("b")]);
        let mut recorder = Recorder::default();
        path.traverse(&mut recorder);

        assert_eq!(recorder.seen, vec!["field:a", "index:0", "field:b"]);
    }

    #[test]
    fn test_traverse_empty_path() {
        let mut recorder = Recorder::default();
        Path::root().traverse(&mut recorder);

        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn test_display() {
        let path = Path::new([field("servers"), index(1), field("host")]);
        assert_eq!(path.to_string(), "servers[1].host");

        let path = Path::new([index(0), index(2)]);
        assert_eq!(path.to_string(), "[0][2]");

        assert_eq!(Path::root().to_string(), "<root>");
    }

    #[test]
    fn test_display_prefix() {
        let path = Path::new([field("a"), index(0), field("b")]);
        assert_eq!(path.display_prefix(2), "a[0]");
        assert_eq!(path.display_prefix(10), "a[0].b");
        assert_eq!(path.display_prefix(0), "<root>");
    }

    #[test]
    fn test_collect_and_equality() {
        let collected: Path = vec![field("x"), index(3)].into_iter().collect();
        assert_eq!(collected, Path::new([PathStep::field("x"), PathStep::index(3)]));
        assert_eq!(collected.steps()[1], PathStep::Index(3));
        assert!(!collected.is_empty());
        assert!(Path::from(Vec::new()).is_empty());
    }
}
