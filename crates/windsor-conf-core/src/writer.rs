//! Canonical text form of a configuration definition.
//!
//! The writer emits imports first, then every top-level block, indenting two
//! spaces per level. Within a node, attributes are written before children.
//! Parsing the output yields a tree equal to the input, as long as:
//!
//! - no node is empty (an empty block reads back as an attribute with an
//!   empty value);
//! - no node has an attribute and a child of the same name (reads back as a
//!   duplicate key);
//! - no value starts with `//`.

use std::fmt::{self, Write};

use crate::{ConfigurationDefinition, ConfigurationNode, Import};

const INDENT: &str = "  ";

/// Write `definition` in canonical form.
pub fn write_definition<W: Write>(
    out: &mut W,
    definition: &ConfigurationDefinition,
) -> fmt::Result {
    for import in definition.imports() {
        write_import(out, import)?;
    }
    for node in definition.root().children() {
        write_node(out, node, 0)?;
    }
    Ok(())
}

/// Write a single node and everything below it, starting at `depth`.
pub fn write_node<W: Write>(out: &mut W, node: &ConfigurationNode, depth: usize) -> fmt::Result {
    write_indent(out, depth)?;
    writeln!(out, "{}:", node.name())?;

    for (key, value) in node.attributes() {
        write_indent(out, depth + 1)?;
        if value.is_empty() {
            writeln!(out, "{key}:")?;
        } else {
            writeln!(out, "{key}: {value}")?;
        }
    }

    for child in node.children() {
        write_node(out, child, depth + 1)?;
    }
    Ok(())
}

fn write_import<W: Write>(out: &mut W, import: &Import) -> fmt::Result {
    match import.assembly() {
        Some(assembly) => writeln!(out, "import {} in {}", import.namespace(), assembly),
        None => writeln!(out, "import {}", import.namespace()),
    }
}

fn write_indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}
