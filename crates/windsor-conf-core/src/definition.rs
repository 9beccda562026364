//! The parse result: imports plus the root node.

use std::fmt;

use serde::Serialize;

use crate::{node::ConfigurationNode, writer};

/// An `import` declaration at the top of a configuration file.
///
/// `import Castle.Facilities.Logging in Castle.Facilities.Logging.dll`
/// has namespace `Castle.Facilities.Logging` and assembly
/// `Castle.Facilities.Logging.dll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assembly: Option<String>,
}

impl Import {
    pub fn new(namespace: impl Into<String>, assembly: Option<String>) -> Self {
        Self {
            namespace: namespace.into(),
            assembly,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }
}

/// A parsed configuration file.
///
/// Every top-level block of the file is a child of [`root`](Self::root).
/// The import list is always present and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationDefinition {
    imports: Vec<Import>,
    root: ConfigurationNode,
}

impl ConfigurationDefinition {
    /// Name given to the root node.
    pub const ROOT_NAME: &'static str = "root";

    pub fn new(imports: Vec<Import>, root: ConfigurationNode) -> Self {
        Self { imports, root }
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn root(&self) -> &ConfigurationNode {
        &self.root
    }
}

/// Writes the canonical text form (see [`writer`]).
///
/// Parsing the output yields an equal tree, with two exceptions:
///
/// - an empty node is written as `name:` and reads back as an attribute
///   with an empty value;
/// - a node holding an attribute and a child of the same name, which only
///   [`NodeBuilder`](crate::NodeBuilder) can produce, reads back as a
///   duplicate key error.
impl fmt::Display for ConfigurationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_definition(f, self)
    }
}
