//! confpath-core: Format-agnostic value lookup
//!
//! A [`Path`] is built once from typed steps and handed to any number of
//! [`Container`]s. Each container (JSON, YAML, environment) interprets the
//! path against its own document and returns a string or a typed [`Error`].
//!
//! # Example
//!
//! ```rust
//! use confpath_core::{field, index, Container, EnvContainer, JsonContainer, Path, YamlContainer};
//!
//! let path = Path::new([field("a"), index(0), field("b")]);
//!
//! let yaml: YamlContainer = "a:\n  - b: from yaml\n".parse().unwrap();
//! assert_eq!(yaml.get_value_at_path(&path).unwrap(), "from yaml");
//!
//! let json: JsonContainer = r#"{"a": [{"b": "from json"}]}"#.parse().unwrap();
//! assert_eq!(json.get_value_at_path(&path).unwrap(), "from json");
//!
//! let env = EnvContainer::from_entries("APP_", ["APP_a.[0].b=from env"]).unwrap();
//! assert_eq!(env.get_value_at_path(&path).unwrap(), "from env");
//! ```

pub mod container;
pub mod env;
pub mod error;
pub mod json;
pub mod node;
pub mod path;
pub mod yaml;

pub use container::{load, load_file, Container, Format};
pub use env::EnvContainer;
pub use error::{Error, ErrorKind, Result};
pub use json::JsonContainer;
pub use node::{Node, NodeKind};
pub use path::{field, index, Path, PathStep, StepVisitor};
pub use yaml::YamlContainer;
