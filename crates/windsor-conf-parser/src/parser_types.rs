use std::fmt;

use crate::span::{Span, Spanned};

/// Syntax tree produced by the parser.
/// Leaf types (keys, names, values) are wrapped in Spanned<T>
/// Composite types use unwrapped collections and derive spans from inner elements
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub statements: Vec<Statement<'a>>,
}

/// A line at some indentation level: an import or a `key:` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Import(Import<'a>),
    Entry(Entry<'a>),
}

/// `import <namespace> [in <assembly>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Import<'a> {
    pub keyword: Span,
    pub namespace: Spanned<&'a str>,
    pub assembly: Option<Spanned<&'a str>>,
}

impl Import<'_> {
    pub fn span(&self) -> Span {
        let span = self.keyword.union(self.namespace.span());
        self.assembly
            .as_ref()
            .map_or(span, |assembly| span.union(assembly.span()))
    }
}

/// `key: value` or `key:` followed by an indented block.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub key: Spanned<&'a str>,
    pub body: EntryBody<'a>,
}

impl Entry<'_> {
    /// Span of the header line, from the key to the value if there is one.
    pub fn span(&self) -> Span {
        match &self.body {
            EntryBody::Attribute(value) => self.key.span().union(value.span()),
            EntryBody::Block(_) => self.key.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody<'a> {
    /// Value text. Empty for a bare `key:` with no block below it.
    Attribute(Spanned<&'a str>),
    Block(Vec<Statement<'a>>),
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Import(import) => {
                write!(f, "import {}", import.namespace)?;
                if let Some(assembly) = &import.assembly {
                    write!(f, " in {assembly}")?;
                }
                Ok(())
            }
            Statement::Entry(entry) => match &entry.body {
                EntryBody::Attribute(value) => write!(f, "{}: {}", entry.key, value),
                EntryBody::Block(statements) => {
                    write!(f, "{}: [{} statements]", entry.key, statements.len())
                }
            },
        }
    }
}
