//! Elaboration phase for the syntax tree
//!
//! This module turns the parser's [`Document`](parser_types::Document) into a
//! [`ConfigurationDefinition`]. It checks the rules the grammar cannot
//! express on its own: imports before the first block, no attributes at the
//! top level, and unique keys among siblings. Every violation is collected so
//! a document reports all of them at once.

use std::collections::HashMap;

use log::{debug, trace};

use windsor_conf_core::{ConfigurationDefinition, ConfigurationNode, Import, NodeBuilder};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types,
    position::LineIndex,
    span::Span,
};

pub struct Builder<'a> {
    index: LineIndex<'a>,
    diagnostics: DiagnosticCollector,
    /// Key of the first top-level block, once seen
    first_block: Option<Span>,
}

impl<'a> Builder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            index: LineIndex::new(source),
            diagnostics: DiagnosticCollector::new(),
            first_block: None,
        }
    }

    pub fn build(
        mut self,
        document: &parser_types::Document<'_>,
    ) -> Result<ConfigurationDefinition, ParseError> {
        debug!(statements_count = document.statements.len(); "Building configuration tree");

        let mut imports = Vec::new();
        let mut root = NodeBuilder::new(ConfigurationDefinition::ROOT_NAME);
        let mut seen = HashMap::new();

        for statement in &document.statements {
            match statement {
                parser_types::Statement::Import(import) => {
                    if self.first_block.is_some() {
                        self.misplaced_import(import);
                        continue;
                    }
                    trace!(namespace = *import.namespace.inner(); "Import");
                    imports.push(Import::new(
                        *import.namespace.inner(),
                        import.assembly.as_ref().map(|a| a.inner().to_string()),
                    ));
                }
                parser_types::Statement::Entry(entry) => match &entry.body {
                    parser_types::EntryBody::Block(statements) => {
                        if self.first_block.is_none() {
                            self.first_block = Some(entry.key.span());
                        }
                        if !self.check_unique(&mut seen, entry) {
                            continue;
                        }
                        let node = self.build_node(*entry.key.inner(), statements);
                        self.insert_child(&mut root, node, entry.key.span());
                    }
                    parser_types::EntryBody::Attribute(_) => {
                        self.emit(
                            Diagnostic::error(format!(
                                "`{}` is an attribute outside of any block",
                                entry.key
                            ))
                            .with_code(ErrorCode::E205)
                            .with_label(entry.span(), "top-level attribute")
                            .with_help(format!(
                                "move it into a block, or write `{}:` followed by indented lines",
                                entry.key
                            )),
                        );
                    }
                },
            }
        }

        self.diagnostics.finish()?;

        let root = root.build();
        debug!(
            imports_count = imports.len(),
            blocks_count = root.child_count();
            "Configuration tree built",
        );
        Ok(ConfigurationDefinition::new(imports, root))
    }

    fn build_node(
        &mut self,
        name: &str,
        statements: &[parser_types::Statement<'_>],
    ) -> ConfigurationNode {
        let mut builder = NodeBuilder::new(name);
        let mut seen = HashMap::new();

        for statement in statements {
            let entry = match statement {
                parser_types::Statement::Import(import) => {
                    self.misplaced_import(import);
                    continue;
                }
                parser_types::Statement::Entry(entry) => entry,
            };

            if !self.check_unique(&mut seen, entry) {
                continue;
            }

            match &entry.body {
                parser_types::EntryBody::Attribute(value) => {
                    if let Err(err) = builder.insert_attribute(*entry.key.inner(), *value.inner()) {
                        self.emit_duplicate(err.to_string(), entry.key.span(), None);
                    }
                }
                parser_types::EntryBody::Block(statements) => {
                    let child = self.build_node(*entry.key.inner(), statements);
                    self.insert_child(&mut builder, child, entry.key.span());
                }
            }
        }

        let node = builder.build();
        trace!(
            node = node.name(),
            attributes = node.attribute_count(),
            children = node.child_count();
            "Node built",
        );
        node
    }

    fn insert_child(&mut self, builder: &mut NodeBuilder, child: ConfigurationNode, span: Span) {
        if let Err(err) = builder.insert_child(child) {
            self.emit_duplicate(err.to_string(), span, None);
        }
    }

    /// Record `entry` among its siblings.
    ///
    /// Attributes and children share one namespace per block. Returns `false`
    /// and emits E202 when the key is already taken.
    fn check_unique<'k>(
        &mut self,
        seen: &mut HashMap<&'k str, Span>,
        entry: &parser_types::Entry<'k>,
    ) -> bool {
        let key = *entry.key.inner();
        match seen.get(key) {
            Some(first) => {
                let first = *first;
                self.emit_duplicate(
                    format!("key `{key}` is defined multiple times in the same block"),
                    entry.key.span(),
                    Some(first),
                );
                false
            }
            None => {
                seen.insert(key, entry.key.span());
                true
            }
        }
    }

    fn emit_duplicate(&mut self, message: String, span: Span, first: Option<Span>) {
        let mut diagnostic = Diagnostic::error(message)
            .with_code(ErrorCode::E202)
            .with_label(span, "duplicate definition");
        if let Some(first) = first {
            diagnostic = diagnostic.with_related_label(first, "first defined here");
        }
        self.emit(diagnostic.with_help("remove the duplicate or use a different name"));
    }

    fn misplaced_import(&mut self, import: &parser_types::Import<'_>) {
        let mut diagnostic = Diagnostic::error(format!(
            "import of `{}` after the first block",
            import.namespace
        ))
        .with_code(ErrorCode::E204)
        .with_label(import.span(), "misplaced import");
        if let Some(first_block) = self.first_block {
            diagnostic = diagnostic.with_related_label(first_block, "first block starts here");
        }
        self.emit(diagnostic.with_help("move imports to the top of the file, before any block"));
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic.locate(&self.index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LabelRole, indent, lexer::tokenize, options::ParseOptions,
        parser::build_document, position::Position,
    };

    fn build(source: &str) -> Result<ConfigurationDefinition, ParseError> {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        let (tokens, _) = indent::process(tokens, &ParseOptions::default())
            .expect("Failed to process indentation");
        let document = build_document(&tokens).expect("Failed to parse document");
        Builder::new(source).build(&document)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_build_tree() {
        let definition =
            build("import A in B\nnode:\n  key: value\n  sub:\n    x: y\n").unwrap();

        assert_eq!(definition.imports(), &[Import::new("A", Some("B".to_string()))]);
        let node = definition.root().child("node").unwrap();
        assert_eq!(node.attribute("key"), Some("value"));
        assert_eq!(node.child("sub").and_then(|s| s.attribute("x")), Some("y"));
        assert_eq!(definition.root().name(), "root");
    }

    #[test]
    fn test_empty_attribute_in_block() {
        let definition = build("node:\n  empty:\n").unwrap();
        let node = definition.root().child("node").unwrap();
        assert_eq!(node.attribute("empty"), Some(""));
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = build("node:\n  a: 1\n  a: 2\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E202]);

        let diagnostic = &err.diagnostics()[0];
        assert_eq!(diagnostic.primary_span(), Some(Span::new(15..16)));
        let related: Vec<_> = diagnostic
            .labels()
            .iter()
            .filter(|l| l.role() == LabelRole::Related)
            .map(|l| (l.span(), l.position()))
            .collect();
        assert_eq!(related, vec![(Span::new(8..9), Some(Position::new(2, 3)))]);
    }

    #[test]
    fn test_duplicates_in_nested_blocks() {
        // Keys borrowed from nested statements are checked per block
        let err = build("node:
  sub:
    a: 1
    a: 2
  sub2:
    b:
      c: 1
    b: 2
")
            .unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E202, ErrorCode::E202]);
        assert_eq!(
            err.diagnostics()[1].to_string(),
            "error[E202]: key `b` is defined multiple times in the same block at 8:5; \
             first defined here at 6:5"
        );
    }

    #[test]
    fn test_attribute_and_child_share_namespace() {
        let err = build("node:\n  a: 1\n  a:\n    b: c\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E202]);
    }

    #[test]
    fn test_duplicate_top_level_block() {
        let err = build("node:\n  a: 1\nnode:\n  b: 2\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E202]);
    }

    #[test]
    fn test_same_key_in_different_blocks() {
        let definition = build("a:\n  x: 1\nb:\n  x: 2\n").unwrap();
        assert_eq!(
            definition.root().find(["b"]).and_then(|n| n.attribute("x")),
            Some("2")
        );
    }

    #[test]
    fn test_misplaced_import() {
        let err = build("node:\n  a: 1\nimport Late\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E204]);
        let first_block = err.diagnostics()[0]
            .labels()
            .iter()
            .find(|l| !l.is_primary())
            .expect("label on the first block");
        assert_eq!(first_block.message(), "first block starts here");
        assert_eq!(first_block.position(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_import_inside_block() {
        let err = build("node:\n  import Nested\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E204]);
    }

    #[test]
    fn test_top_level_attribute() {
        let err = build("key: value\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E205]);
        assert_eq!(
            err.diagnostics()[0].position().map(|p| p.to_string()),
            Some("1:1".to_string())
        );

        let err = build("empty:\n").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E205]);
    }

    #[test]
    fn test_all_violations_reported() {
        let err = build("top: 1\nnode:\n  a: 1\n  a: 2\nimport Late\n").unwrap_err();
        assert_eq!(
            codes(&err),
            vec![ErrorCode::E205, ErrorCode::E202, ErrorCode::E204]
        );
    }

    #[test]
    fn test_empty_document() {
        let definition = build("").unwrap();
        assert!(definition.imports().is_empty());
        assert!(definition.root().is_empty());
    }
}
