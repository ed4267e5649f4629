//! C# front-end built on tree-sitter.
//!
//! [`SourceFile::parse`] turns text into a tree and rejects input containing
//! syntax errors. Rules only ever see borrowed [`SyntaxNode`] views of that
//! tree; nothing in the engine mutates it.

pub mod csharp;

use crate::error::{Error, Result};
use crate::types::Location;
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// A parsed C# source file.
pub struct SourceFile {
    source: String,
    tree: Tree,
}

impl SourceFile {
    /// Parse C# source text.
    ///
    /// Fails with [`Error::Parse`] pointing at the first error or missing
    /// token when the text is not well-formed.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();

        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into())?;

        let tree = parser
            .parse(&source, None)
            .ok_or(Error::Parse { line: 1, column: 1 })?;

        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            return Err(Error::Parse {
                line: bad.start_position().row + 1,
                column: bad.start_position().column + 1,
            });
        }

        Ok(Self { source, tree })
    }

    /// The `compilation_unit` node.
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            node: self.tree.root_node(),
            source: &self.source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

/// Read-only view of a node together with the text it was parsed from.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> SyntaxNode<'t> {
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text of the subtree rooted at this node.
    pub fn text(&self) -> &'t str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub fn location(&self) -> Location {
        let start = self.node.start_position();
        let end = self.node.end_position();
        Location {
            start_byte: self.node.start_byte(),
            end_byte: self.node.end_byte(),
            start_line: start.row + 1,
            start_column: self.char_column(self.node.start_byte(), start.column),
            end_line: end.row + 1,
            end_column: self.char_column(self.node.end_byte(), end.column),
        }
    }

    /// 1-based character column of `byte`, given tree-sitter's byte column.
    fn char_column(&self, byte: usize, byte_column: usize) -> usize {
        let line_start = byte.saturating_sub(byte_column);
        self.source
            .get(line_start..byte)
            .map_or(byte_column, |prefix| prefix.chars().count())
            + 1
    }

    pub fn field(&self, name: &str) -> Option<SyntaxNode<'t>> {
        self.node.child_by_field_name(name).map(|node| self.wrap(node))
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.node.parent().map(|node| self.wrap(node))
    }

    pub fn named_children(&self) -> Vec<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| self.wrap(node))
            .collect()
    }

    /// Named descendants in document order, excluding this node.
    ///
    /// Each call starts a fresh traversal.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            cursor: self.node.walk(),
            source: self.source,
            depth: 0,
            done: false,
        }
    }

    pub fn descendants_of_kind(&self, kind: &'static str) -> impl Iterator<Item = SyntaxNode<'t>> {
        self.descendants().filter(move |n| n.kind() == kind)
    }

    fn wrap(&self, node: Node<'t>) -> SyntaxNode<'t> {
        SyntaxNode {
            node,
            source: self.source,
        }
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.kind(), self.location())
    }
}

/// Pre-order walk over the named nodes below a root.
pub struct Descendants<'t> {
    cursor: TreeCursor<'t>,
    source: &'t str,
    depth: usize,
    done: bool,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if self.cursor.goto_first_child() {
                self.depth += 1;
            } else {
                // Climb until a sibling exists; depth 0 is the walk's root.
                loop {
                    if self.depth == 0 {
                        self.done = true;
                        return None;
                    }
                    if self.cursor.goto_next_sibling() {
                        break;
                    }
                    self.cursor.goto_parent();
                    self.depth -= 1;
                }
            }

            let node = self.cursor.node();
            if node.is_named() {
                return Some(SyntaxNode {
                    node,
                    source: self.source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let file = SourceFile::parse("class A { void M() { } }").unwrap();
        assert_eq!(file.root().kind(), "compilation_unit");
    }

    #[test]
    fn test_parse_reports_error_position() {
        let err = SourceFile::parse("class A {\n  void M( { \n").err().unwrap();
        match err {
            Error::Parse { line, .. } => assert!(line >= 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_descendants_document_order() {
        let file = SourceFile::parse("class A { void M() { F(); G(); } }").unwrap();
        let calls: Vec<_> = file
            .root()
            .descendants_of_kind("invocation_expression")
            .map(|n| n.text())
            .collect();
        assert_eq!(calls, vec!["F()", "G()"]);
    }

    #[test]
    fn test_descendants_exclude_self_and_restart() {
        let file = SourceFile::parse("class A { void M() { F(); } }").unwrap();
        let call = file
            .root()
            .descendants_of_kind("invocation_expression")
            .next()
            .unwrap();
        assert!(call.descendants().all(|n| n != call));

        let first: Vec<_> = call.descendants().map(|n| n.kind()).collect();
        let second: Vec<_> = call.descendants().map(|n| n.kind()).collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_descendants_stay_inside_subtree() {
        let file = SourceFile::parse("class A { void M() { F(); } void N() { G(); } }").unwrap();
        let method = file
            .root()
            .descendants_of_kind("method_declaration")
            .next()
            .unwrap();
        let texts: Vec<_> = method
            .descendants_of_kind("invocation_expression")
            .map(|n| n.text())
            .collect();
        assert_eq!(texts, vec!["F()"]);
    }

    #[test]
    fn test_grammar_loads() {
        let mut parser = Parser::new();
        assert!(parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .is_ok());
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "class A {\n  void M() { var s = \"\u{e9}\"; F(); }\n}";
        let file = SourceFile::parse(source).unwrap();
        let call = file
            .root()
            .descendants_of_kind("invocation_expression")
            .next()
            .unwrap();
        let loc = call.location();
        assert_eq!(loc.start_line, 2);
        assert_eq!(loc.start_column, 27);
        assert_eq!(loc.end_column, 30);
        assert_eq!(&source[loc.start_byte..loc.end_byte], "F()");
    }

    #[test]
    fn test_location_is_one_based() {
        let file = SourceFile::parse("class A {\n  void M() { F(); }\n}").unwrap();
        let call = file
            .root()
            .descendants_of_kind("invocation_expression")
            .next()
            .unwrap();
        let loc = call.location();
        assert_eq!(loc.start_line, 2);
        assert_eq!(loc.start_column, 14);
    }
}
