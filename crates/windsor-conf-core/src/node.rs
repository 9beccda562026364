//! Configuration nodes.
//!
//! A [`ConfigurationNode`] is one named block of a configuration file. It
//! holds scalar attributes and nested child nodes in two separate ordered
//! maps. Nodes are read-only; they are assembled with a [`NodeBuilder`].
//!
//! # Example
//!
//! ```
//! # use windsor_conf_core::{ConfigurationNode, DuplicateKeyError};
//! # fn main() -> Result<(), DuplicateKeyError> {
//! let sub = ConfigurationNode::builder("sub")
//!     .attribute("other1", "value3")?
//!     .build();
//!
//! let container = ConfigurationNode::builder("container")
//!     .attribute("item", "value")?
//!     .child(sub)?
//!     .build();
//!
//! assert_eq!(container.attribute("item"), Some("value"));
//! assert_eq!(container.find(["sub"]).and_then(|n| n.attribute("other1")), Some("value3"));
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// A key was inserted twice into the same map of a [`NodeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuplicateKeyError {
    #[error("attribute `{key}` is already defined in `{node}`")]
    Attribute { node: String, key: String },

    #[error("child `{key}` is already defined in `{node}`")]
    Child { node: String, key: String },
}

/// A named block in the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationNode {
    name: String,
    attributes: IndexMap<String, String>,
    children: IndexMap<String, ConfigurationNode>,
}

impl ConfigurationNode {
    /// Start building a node with the given name.
    pub fn builder(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(name)
    }

    /// The node name. May contain dots, which carry no meaning.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Look up a direct child node by name.
    ///
    /// Returns `None` when absent; a present node with no content is
    /// returned as `Some` and reports [`is_empty`](Self::is_empty).
    pub fn child(&self, name: &str) -> Option<&ConfigurationNode> {
        self.children.get(name)
    }

    /// Walk down a path of child names, one segment per level.
    ///
    /// Segments are matched literally, so `["sub.sub"]` finds a child named
    /// `sub.sub` and not a `sub` nested in a `sub`. An empty path returns
    /// `self`.
    pub fn find<'a, I>(&self, path: I) -> Option<&ConfigurationNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of attributes on this node.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Number of direct children of this node.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the node has neither attributes nor children.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// Iterate attributes in definition order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterate children in definition order.
    pub fn children(&self) -> impl Iterator<Item = &ConfigurationNode> {
        self.children.values()
    }
}

/// Builder for [`ConfigurationNode`].
///
/// Attribute keys and child names are each unique within their own map.
/// The builder does not check one map against the other.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: ConfigurationNode,
}

impl NodeBuilder {
    /// Create a builder for an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: ConfigurationNode {
                name: name.into(),
                attributes: IndexMap::new(),
                children: IndexMap::new(),
            },
        }
    }

    /// Add an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError::Attribute`] if `key` is already present.
    pub fn attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, DuplicateKeyError> {
        self.insert_attribute(key, value)?;
        Ok(self)
    }

    /// Add a child node, keyed by its name.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError::Child`] if a child with the same name is
    /// already present.
    pub fn child(mut self, child: ConfigurationNode) -> Result<Self, DuplicateKeyError> {
        self.insert_child(child)?;
        Ok(self)
    }

    /// In-place variant of [`attribute`](Self::attribute).
    pub fn insert_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DuplicateKeyError> {
        let key = key.into();
        if self.node.attributes.contains_key(&key) {
            return Err(DuplicateKeyError::Attribute {
                node: self.node.name.clone(),
                key,
            });
        }
        self.node.attributes.insert(key, value.into());
        Ok(())
    }

    /// In-place variant of [`child`](Self::child).
    pub fn insert_child(&mut self, child: ConfigurationNode) -> Result<(), DuplicateKeyError> {
        if self.node.children.contains_key(&child.name) {
            return Err(DuplicateKeyError::Child {
                node: self.node.name.clone(),
                key: child.name,
            });
        }
        self.node.children.insert(child.name.clone(), child);
        Ok(())
    }

    /// Finish building.
    pub fn build(self) -> ConfigurationNode {
        self.node
    }
}
