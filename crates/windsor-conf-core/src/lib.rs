//! Windsor Configuration Core Types
//!
//! This crate provides the data model produced by parsing the Windsor
//! configuration language. It includes:
//!
//! - **Nodes**: Named blocks holding attributes and child nodes ([`ConfigurationNode`])
//! - **Definitions**: The parse result with imports and the root node ([`ConfigurationDefinition`])
//! - **Writer**: Canonical text rendering of a definition ([`writer`] module)
//!
//! All types are immutable once built. Nodes are assembled through
//! [`NodeBuilder`], which rejects duplicate keys.

mod definition;
mod node;
pub mod writer;

pub use definition::{ConfigurationDefinition, Import};
pub use node::{ConfigurationNode, DuplicateKeyError, NodeBuilder};
