//! Structural accessors for the tree-sitter C# grammar.

use super::SyntaxNode;

/// Node kinds the rules match on.
pub mod kinds {
    pub const COMPILATION_UNIT: &str = "compilation_unit";
    pub const METHOD_DECLARATION: &str = "method_declaration";
    pub const ATTRIBUTE_LIST: &str = "attribute_list";
    pub const ATTRIBUTE: &str = "attribute";
    pub const BLOCK: &str = "block";
    pub const COMMENT: &str = "comment";
    pub const EMPTY_STATEMENT: &str = "empty_statement";
    pub const IF_STATEMENT: &str = "if_statement";
    pub const TRY_STATEMENT: &str = "try_statement";
    pub const CATCH_CLAUSE: &str = "catch_clause";
    pub const CATCH_DECLARATION: &str = "catch_declaration";
    pub const INVOCATION_EXPRESSION: &str = "invocation_expression";
    pub const MEMBER_ACCESS_EXPRESSION: &str = "member_access_expression";
    pub const OBJECT_CREATION_EXPRESSION: &str = "object_creation_expression";
    pub const BINARY_EXPRESSION: &str = "binary_expression";
    pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
    pub const INITIALIZER_EXPRESSION: &str = "initializer_expression";
    pub const ARGUMENT: &str = "argument";
    pub const ARGUMENT_LIST: &str = "argument_list";

    /// Literal kinds that carry string text.
    pub const STRING_LITERALS: &[&str] = &[
        "string_literal",
        "verbatim_string_literal",
        "raw_string_literal",
    ];
}

impl<'t> SyntaxNode<'t> {
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind() == kind
    }

    pub fn is_string_literal(&self) -> bool {
        kinds::STRING_LITERALS.contains(&self.kind())
    }

    /// Body block of a method, catch clause or try statement.
    ///
    /// Expression-bodied members have no block and return `None`.
    pub fn body_block(&self) -> Option<SyntaxNode<'t>> {
        match self.field("body") {
            Some(body) if body.is_kind(kinds::BLOCK) => Some(body),
            Some(_) => None,
            None => self
                .named_children()
                .into_iter()
                .find(|c| c.is_kind(kinds::BLOCK)),
        }
    }

    /// Statements directly inside a block; comments and preprocessor lines are trivia.
    pub fn statements(&self) -> Vec<SyntaxNode<'t>> {
        self.named_children()
            .into_iter()
            .filter(|c| !c.is_kind(kinds::COMMENT) && !c.kind().starts_with("preproc"))
            .collect()
    }

    /// Names of all attributes attached to a declaration, e.g. `HttpPost`.
    pub fn attribute_names(&self) -> Vec<&'t str> {
        self.named_children()
            .into_iter()
            .filter(|c| c.is_kind(kinds::ATTRIBUTE_LIST))
            .flat_map(|list| list.named_children())
            .filter(|a| a.is_kind(kinds::ATTRIBUTE))
            .filter_map(|a| a.field("name"))
            .map(|name| name.text())
            .collect()
    }

    /// Declared name of a method or type.
    pub fn name_text(&self) -> &'t str {
        self.field("name").map(|n| n.text()).unwrap_or("")
    }

    /// Callee expression of an invocation.
    pub fn callee(&self) -> Option<SyntaxNode<'t>> {
        self.field("function")
    }

    /// Arguments of an invocation or object construction.
    pub fn arguments(&self) -> Vec<SyntaxNode<'t>> {
        self.field("arguments")
            .filter(|list| list.is_kind(kinds::ARGUMENT_LIST))
            .map(|list| {
                list.named_children()
                    .into_iter()
                    .filter(|a| a.is_kind(kinds::ARGUMENT))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Receiver and member name of a member access such as `reader.Deserialize`.
    pub fn member_parts(&self) -> Option<(SyntaxNode<'t>, SyntaxNode<'t>)> {
        if !self.is_kind(kinds::MEMBER_ACCESS_EXPRESSION) {
            return None;
        }
        Some((self.field("expression")?, self.field("name")?))
    }

    /// Type text of an object construction, e.g. `XmlReaderSettings`.
    pub fn constructed_type(&self) -> Option<&'t str> {
        self.field("type").map(|t| t.text())
    }

    /// Assignments inside an object initializer (`new T { A = b }`).
    pub fn initializer_assignments(&self) -> Vec<SyntaxNode<'t>> {
        self.field("initializer")
            .or_else(|| {
                self.named_children()
                    .into_iter()
                    .find(|c| c.is_kind(kinds::INITIALIZER_EXPRESSION))
            })
            .map(|init| {
                init.named_children()
                    .into_iter()
                    .filter(|c| c.is_kind(kinds::ASSIGNMENT_EXPRESSION))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Operator token text of a binary expression.
    pub fn operator_text(&self) -> &'t str {
        self.field("operator").map(|o| o.text()).unwrap_or("")
    }

    /// Declared exception type and variable of a catch clause.
    pub fn catch_declaration(&self) -> Option<(Option<&'t str>, Option<&'t str>)> {
        let decl = self
            .named_children()
            .into_iter()
            .find(|c| c.is_kind(kinds::CATCH_DECLARATION))?;
        Some((
            decl.field("type").map(|t| t.text()),
            decl.field("name").map(|n| n.text()),
        ))
    }
}

/// Whether a type reference names `simple`, optionally namespace-qualified.
///
/// `System.Xml.XmlUrlResolver` and `XmlUrlResolver` both name `XmlUrlResolver`.
pub fn type_names(type_text: &str, simple: &str) -> bool {
    let trimmed = type_text.trim();
    trimmed == simple
        || trimmed
            .strip_suffix(simple)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceFile;

    fn first<'t>(root: SyntaxNode<'t>, kind: &'static str) -> SyntaxNode<'t> {
        root.descendants_of_kind(kind).next().unwrap()
    }

    #[test]
    fn test_attribute_names() {
        let file = SourceFile::parse(
            "class C { [HttpPost, Authorize] [ValidateAntiForgeryToken] public void Save() { } }",
        )
        .unwrap();
        let method = first(file.root(), kinds::METHOD_DECLARATION);
        assert_eq!(
            method.attribute_names(),
            vec!["HttpPost", "Authorize", "ValidateAntiForgeryToken"]
        );
        assert_eq!(method.name_text(), "Save");
    }

    #[test]
    fn test_statements_skip_comments() {
        let file = SourceFile::parse(
            "class C { void M() { try { } catch (Exception e) { // ignored\n ; } } }",
        )
        .unwrap();
        let catch = first(file.root(), kinds::CATCH_CLAUSE);
        let body = catch.body_block().unwrap();
        let found: Vec<_> = body.statements().iter().map(|s| s.kind()).collect();
        assert_eq!(found, vec![kinds::EMPTY_STATEMENT]);
        assert_eq!(catch.catch_declaration(), Some((Some("Exception"), Some("e"))));
    }

    #[test]
    fn test_member_parts_and_arguments() {
        let file =
            SourceFile::parse("class C { void M() { formatter.Deserialize(stream, 1); } }").unwrap();
        let call = first(file.root(), kinds::INVOCATION_EXPRESSION);
        let (receiver, name) = call.callee().unwrap().member_parts().unwrap();
        assert_eq!(receiver.text(), "formatter");
        assert_eq!(name.text(), "Deserialize");
        let args: Vec<_> = call.arguments().iter().map(|a| a.text()).collect();
        assert_eq!(args, vec!["stream", "1"]);
    }

    #[test]
    fn test_constructed_type_and_initializer() {
        let file = SourceFile::parse(
            "class C { void M() { var s = new XmlReaderSettings { DtdProcessing = DtdProcessing.Parse }; } }",
        )
        .unwrap();
        let creation = first(file.root(), kinds::OBJECT_CREATION_EXPRESSION);
        assert_eq!(creation.constructed_type(), Some("XmlReaderSettings"));
        let assignments: Vec<_> = creation
            .initializer_assignments()
            .iter()
            .map(|a| a.text())
            .collect();
        assert_eq!(assignments, vec!["DtdProcessing = DtdProcessing.Parse"]);
    }

    #[test]
    fn test_type_names() {
        assert!(type_names("XmlUrlResolver", "XmlUrlResolver"));
        assert!(type_names("System.Xml.XmlUrlResolver", "XmlUrlResolver"));
        assert!(!type_names("MyXmlUrlResolver", "XmlUrlResolver"));
        assert!(!type_names("XmlUrlResolverFactory", "XmlUrlResolver"));
    }
}
