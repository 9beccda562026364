//! End-to-end tests for the parsing pipeline
//!
//! These tests run source text through every phase and check the resulting
//! configuration tree, or the diagnostics of the phase that fails.

use windsor_conf_core::{ConfigurationDefinition, ConfigurationNode, NodeBuilder};

use crate::{
    ParseOptions,
    error::{ErrorCode, ErrorKind, ParseError},
    parse,
};

/// Helper function to parse a source string with default options
fn parse_source(source: &str) -> Result<ConfigurationDefinition, ParseError> {
    parse(source, ParseOptions::default())
}

/// Helper function to parse a source string and assert success
fn assert_parses(source: &str) -> ConfigurationDefinition {
    match parse_source(source) {
        Ok(definition) => definition,
        Err(e) => panic!("Expected parsing to succeed, but got error: {e}"),
    }
}

/// Helper function to parse a source string and return the first error code
fn first_error_code(source: &str) -> ErrorCode {
    let err = match parse_source(source) {
        Ok(_) => panic!("Expected parsing to fail, but it succeeded"),
        Err(e) => e,
    };
    err.diagnostics()
        .first()
        .and_then(|d| d.code())
        .expect("error diagnostics carry a code")
}

fn container(definition: &ConfigurationDefinition) -> &ConfigurationNode {
    definition
        .root()
        .child("container")
        .expect("`container` block should exist")
}

// =============================================================================
// Single node
// =============================================================================

#[test]
fn test_single_node_and_attributes() {
    let definition = assert_parses("container: \r\n  item: value\r\n  item2: value2\r\n");

    assert!(definition.imports().is_empty());
    assert_eq!(definition.root().child_count(), 1);

    let container = container(&definition);
    assert_eq!(container.attribute("item"), Some("value"));
    assert_eq!(container.attribute("item2"), Some("value2"));
    assert_eq!(container.attribute_count(), 2);
    assert_eq!(container.child_count(), 0);
}

#[test]
fn test_single_node_and_attributes_using_tab() {
    let definition = assert_parses("container:\r\n\titem: value\r\n\titem2: value2\r\n");

    assert!(definition.imports().is_empty());
    let container = container(&definition);
    assert_eq!(container.attribute("item"), Some("value"));
    assert_eq!(container.attribute("item2"), Some("value2"));
    assert_eq!(container.attribute_count(), 2);
}

#[test]
fn test_tab_and_spaces_yield_same_tree() {
    let spaces = assert_parses("container:\r\n  item: value\r\n  item2: value2\r\n");
    let tabs = assert_parses("container:\r\n\titem: value\r\n\titem2: value2\r\n");
    assert_eq!(spaces, tabs);
}

#[test]
fn test_attribute_order_is_preserved() {
    let definition = assert_parses("container:\n  z: 1\n  a: 2\n  m: 3\n");
    let keys: Vec<_> = container(&definition).attributes().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

// =============================================================================
// Nesting
// =============================================================================

#[test]
fn test_nested_block() {
    let definition =
        assert_parses("container:\r\n  item: value\r\n  sub:\r\n    other1: value3\r\n");

    let sub = container(&definition).child("sub").expect("`sub` block");
    assert_eq!(sub.attribute("other1"), Some("value3"));
}

#[test]
fn test_tree3() {
    let definition = assert_parses(concat!(
        "container: \r\n",
        "  item: value\r\n",
        "  item2: value2\r\n",
        "  sub: \r\n",
        "    other1: value3\r\n",
        "    other2: value4\r\n",
    ));

    let container = container(&definition);
    assert_eq!(container.attribute("item"), Some("value"));
    assert_eq!(container.attribute("item2"), Some("value2"));
    assert_eq!(container.attribute_count(), 2);

    let sub = container.child("sub").expect("`sub` block");
    assert_eq!(sub.attribute("other1"), Some("value3"));
    assert_eq!(sub.attribute("other2"), Some("value4"));
    assert_eq!(sub.attribute_count(), 2);
}

#[test]
fn test_dedent_to_outer_level() {
    let definition = assert_parses("a:\n  b:\n    c:\n      d: 1\n  e: 2\nf:\n  g: 3\n");

    let a = definition.root().child("a").unwrap();
    assert_eq!(a.attribute("e"), Some("2"));
    assert_eq!(
        a.find(["b", "c"]).and_then(|c| c.attribute("d")),
        Some("1")
    );
    assert_eq!(
        definition.root().child("f").and_then(|f| f.attribute("g")),
        Some("3")
    );
}

#[test]
fn test_final_line_without_newline() {
    let definition = assert_parses("a:\n  b:\n    c: d");
    assert_eq!(
        definition.root().find(["a", "b"]).and_then(|b| b.attribute("c")),
        Some("d")
    );
}

#[test]
fn test_present_but_empty_versus_absent() {
    let definition = assert_parses("a:\n  empty:\n  b: 1\n");
    let a = definition.root().child("a").unwrap();
    assert_eq!(a.attribute("empty"), Some(""));
    assert_eq!(a.attribute("missing"), None);
    assert!(a.child("empty").is_none());
}

// =============================================================================
// Dots
// =============================================================================

#[test]
fn test_dots() {
    let definition = assert_parses(concat!(
        "container: \r\n",
        "  item.1: my.key\r\n",
        "  item.2: value2\r\n",
        "  sub.sub: \r\n",
        "    other1: value3\r\n",
        "    other2: value4\r\n",
    ));

    let container = container(&definition);
    assert_eq!(container.attribute("item.1"), Some("my.key"));
    assert_eq!(container.attribute("item.2"), Some("value2"));
    assert_eq!(container.attribute_count(), 2);

    // Dots are part of the name, never a path
    let sub = container.child("sub.sub").expect("`sub.sub` block");
    assert!(container.child("sub").is_none());
    assert_eq!(sub.attribute("other1"), Some("value3"));
    assert_eq!(sub.attribute("other2"), Some("value4"));
}

#[test]
fn test_values_keep_punctuation() {
    let definition = assert_parses(concat!(
        "container:\n",
        "  url: http://localhost:8080/path?q=1\n",
        "  list: a, b; c\n",
        "  spaced: some  inner  text   \n",
    ));
    let container = container(&definition);
    assert_eq!(container.attribute("url"), Some("http://localhost:8080/path?q=1"));
    assert_eq!(container.attribute("list"), Some("a, b; c"));
    assert_eq!(container.attribute("spaced"), Some("some  inner  text"));
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn test_comments_before_block() {
    let definition = assert_parses(concat!(
        "// comments\r\n",
        "container: \r\n",
        "  item.1: my.key\r\n",
        "  item.2: value2\r\n",
    ));
    let container = container(&definition);
    assert_eq!(container.attribute("item.1"), Some("my.key"));
    assert_eq!(container.attribute("item.2"), Some("value2"));
    assert_eq!(container.attribute_count(), 2);
}

#[test]
fn test_comments_after_header_unindented() {
    let definition = assert_parses(concat!(
        "container: \r\n",
        "// comments\r\n",
        "  item.1: my.key\r\n",
        "  item.2: value2\r\n",
    ));
    let container = container(&definition);
    assert_eq!(container.attribute("item.1"), Some("my.key"));
    assert_eq!(container.attribute_count(), 2);
}

#[test]
fn test_comments_inside_block() {
    let definition = assert_parses(concat!(
        "container: \r\n",
        "  // comments\r\n",
        "  item.1: my.key\r\n",
        "  item.2: value2\r\n",
    ));
    let container = container(&definition);
    assert_eq!(container.attribute("item.1"), Some("my.key"));
    assert_eq!(container.attribute_count(), 2);
}

#[test]
fn test_trailing_comment_on_header() {
    let definition = assert_parses("container: // the container\n  item: value\n");
    assert_eq!(container(&definition).attribute("item"), Some("value"));
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_imports() {
    let definition = assert_parses(concat!(
        "import Castle.Facilities.Logging in Castle.Facilities.Logging.dll\n",
        "import Castle.Core\n",
        "\n",
        "container:\n",
        "  item: value\n",
    ));

    let imports: Vec<_> = definition
        .imports()
        .iter()
        .map(|i| (i.namespace(), i.assembly()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (
                "Castle.Facilities.Logging",
                Some("Castle.Facilities.Logging.dll")
            ),
            ("Castle.Core", None),
        ]
    );
    assert!(definition.root().child("container").is_some());
}

#[test]
fn test_imports_without_blocks() {
    let definition = assert_parses("import Only.Imports\n");
    assert_eq!(definition.imports().len(), 1);
    assert!(definition.root().is_empty());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_inconsistent_dedent_is_indentation_error() {
    let err = parse_source("container:\n    item: value\n  other: value\n").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Indentation));
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
}

#[test]
fn test_error_codes_per_phase() {
    let cases = [
        ("container:\n  item = value\n", ErrorCode::E001),
        ("container:\r  item: value\n", ErrorCode::E002),
        ("a:\n    b: c\n  d: e\n", ErrorCode::E100),
        ("a:\n  b: c\n: d\n", ErrorCode::E200),
        ("a:\n  b c\n", ErrorCode::E201),
        ("a:\n  b: c\n  b: d\n", ErrorCode::E202),
        ("a:\n  b: c\n    d: e\n", ErrorCode::E203),
        ("a:\n  b: c\nimport X\n", ErrorCode::E204),
        ("a: b\n", ErrorCode::E205),
    ];

    for (source, expected) in cases {
        assert_eq!(first_error_code(source), expected, "source: {source:?}");
    }
}

#[test]
fn test_lexer_reports_every_bad_character() {
    let err = parse_source("a:\n  b = c\n  d # e\n").unwrap_err();
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E001, ErrorCode::E001]);
}

#[test]
fn test_error_display_includes_position() {
    let err = parse_source("a:\n  b: c\n    d: e\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "error[E203]: unexpected indentation at 3:1"
    );
}

#[test]
fn test_custom_tab_width() {
    let options = ParseOptions::new(4).unwrap();
    let spaces = parse("a:\n    b: c\n", options).unwrap();
    let tabs = parse("a:\n\tb: c\n", options).unwrap();
    assert_eq!(spaces, tabs);
}

// =============================================================================
// Canonical text
// =============================================================================

#[test]
fn test_canonical_text_reparses() {
    let definition = assert_parses("import A in B\nouter:\n  key: v\n  inner:\n    x: 1\n");
    assert_eq!(assert_parses(&definition.to_string()), definition);
}

#[test]
fn test_empty_node_reads_back_as_empty_attribute() {
    let node = NodeBuilder::new("node")
        .child(NodeBuilder::new("empty").build())
        .unwrap()
        .build();
    let root = NodeBuilder::new(ConfigurationDefinition::ROOT_NAME)
        .child(node)
        .unwrap()
        .build();
    let definition = ConfigurationDefinition::new(Vec::new(), root);

    let reparsed = assert_parses(&definition.to_string());
    let node = reparsed.root().child("node").unwrap();
    assert!(node.child("empty").is_none());
    assert_eq!(node.attribute("empty"), Some(""));
}

#[test]
fn test_shared_attribute_and_child_name_does_not_reparse() {
    let node = NodeBuilder::new("node")
        .attribute("x", "1")
        .and_then(|b| b.child(NodeBuilder::new("x").attribute("y", "2")?.build()))
        .unwrap()
        .build();
    let root = NodeBuilder::new(ConfigurationDefinition::ROOT_NAME)
        .child(node)
        .unwrap()
        .build();
    let definition = ConfigurationDefinition::new(Vec::new(), root);

    assert_eq!(first_error_code(&definition.to_string()), ErrorCode::E202);
}

// =============================================================================
// Properties
// =============================================================================

mod proptest_tests {
    use proptest::prelude::*;
    use windsor_conf_core::{ConfigurationDefinition, ConfigurationNode, Import, NodeBuilder};

    use crate::{ParseOptions, parse};

    // ===================
    // Strategies
    // ===================

    #[derive(Debug, Clone)]
    enum Item {
        Attribute(String, String),
        Block(String, Vec<Item>),
    }

    fn key_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_.-]{0,12}"
    }

    /// Values as the lexer returns them: trimmed and not starting with `//`.
    fn value_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            1 => Just(String::new()),
            8 => "[a-zA-Z0-9.:/=;,_-]([a-zA-Z0-9 .:/=;,_-]{0,20}[a-zA-Z0-9.:/=;,_-])?"
                .prop_filter("not a comment", |s| !s.starts_with("//")),
        ]
    }

    fn item_strategy() -> impl Strategy<Value = Item> {
        let leaf = (key_strategy(), value_strategy()).prop_map(|(k, v)| Item::Attribute(k, v));
        leaf.prop_recursive(3, 32, 4, |inner| {
            (key_strategy(), prop::collection::vec(inner, 1..4))
                .prop_map(|(k, items)| Item::Block(k, items))
        })
    }

    fn import_strategy() -> impl Strategy<Value = Import> {
        let name = "[A-Z][a-zA-Z]{0,6}(\\.[A-Z][a-zA-Z]{0,6}){0,2}";
        (name, prop::option::of(name))
            .prop_map(|(namespace, assembly)| Import::new(namespace, assembly))
    }

    /// Assemble a node, dropping keys already used by a sibling.
    fn build_node(name: &str, items: &[Item]) -> ConfigurationNode {
        let mut builder = NodeBuilder::new(name);
        let mut seen = std::collections::HashSet::new();
        for item in items {
            match item {
                Item::Attribute(key, value) if seen.insert(key.clone()) => {
                    builder.insert_attribute(key.as_str(), value.as_str()).unwrap();
                }
                Item::Block(key, items) if seen.insert(key.clone()) => {
                    builder.insert_child(build_node(key, items)).unwrap();
                }
                _ => {}
            }
        }
        builder.build()
    }

    fn definition_strategy() -> impl Strategy<Value = ConfigurationDefinition> {
        (
            prop::collection::vec(import_strategy(), 0..3),
            prop::collection::vec(
                (key_strategy(), prop::collection::vec(item_strategy(), 1..4)),
                0..4,
            ),
        )
            .prop_map(|(imports, blocks)| {
                let items: Vec<_> = blocks
                    .into_iter()
                    .map(|(key, items)| Item::Block(key, items))
                    .collect();
                let root = build_node(ConfigurationDefinition::ROOT_NAME, &items);
                ConfigurationDefinition::new(imports, root)
            })
    }

    // ===================
    // Helpers
    // ===================

    fn parse_default(source: &str) -> Result<ConfigurationDefinition, TestCaseError> {
        parse(source, ParseOptions::default())
            .map_err(|e| TestCaseError::fail(format!("{e}\nsource:\n{source}")))
    }

    /// Replace every pair of leading spaces with a tab.
    fn tabify(source: &str) -> String {
        source
            .lines()
            .map(|line| {
                let content = line.trim_start_matches(' ');
                let depth = (line.len() - content.len()) / 2;
                format!("{}{content}\n", "\t".repeat(depth))
            })
            .collect()
    }

    /// Insert a comment line before each line whose flag is set.
    fn with_comments(source: &str, comments: &[(bool, usize)]) -> String {
        let mut out = String::new();
        let mut flags = comments.iter();
        for line in source.lines() {
            if let Some((true, indent)) = flags.next() {
                out.push_str(&" ".repeat(*indent));
                out.push_str("// comment\n");
            }
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("// trailing comment\n");
        out
    }

    // ===================
    // Property Test Functions
    // ===================

    /// The canonical text form parses back into the same tree.
    fn check_writer_round_trip(definition: &ConfigurationDefinition) -> Result<(), TestCaseError> {
        let source = definition.to_string();
        let parsed = parse_default(&source)?;
        prop_assert_eq!(&parsed, definition);
        Ok(())
    }

    /// Parsing the same text twice gives equal trees.
    fn check_deterministic(definition: &ConfigurationDefinition) -> Result<(), TestCaseError> {
        let source = definition.to_string();
        let first = parse_default(&source)?;
        let second = parse_default(&source)?;
        prop_assert_eq!(first, second);
        Ok(())
    }

    /// One tab per level yields the same tree as two spaces per level.
    fn check_tabs_match_spaces(definition: &ConfigurationDefinition) -> Result<(), TestCaseError> {
        let source = definition.to_string();
        let spaces = parse_default(&source)?;
        let tabs = parse_default(&tabify(&source))?;
        prop_assert_eq!(spaces, tabs);
        Ok(())
    }

    /// Comment-only lines at any indentation leave the tree unchanged.
    fn check_comment_lines_ignored(
        definition: &ConfigurationDefinition,
        comments: &[(bool, usize)],
    ) -> Result<(), TestCaseError> {
        let source = definition.to_string();
        let plain = parse_default(&source)?;
        let commented = parse_default(&with_comments(&source, comments))?;
        prop_assert_eq!(plain, commented);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn writer_round_trip(definition in definition_strategy()) {
            check_writer_round_trip(&definition)?;
        }

        #[test]
        fn parsing_is_deterministic(definition in definition_strategy()) {
            check_deterministic(&definition)?;
        }

        #[test]
        fn tabs_match_spaces(definition in definition_strategy()) {
            check_tabs_match_spaces(&definition)?;
        }

        #[test]
        fn comment_lines_ignored(
            definition in definition_strategy(),
            comments in prop::collection::vec((any::<bool>(), 0usize..8), 0..64),
        ) {
            check_comment_lines_ignored(&definition, &comments)?;
        }
    }
}
