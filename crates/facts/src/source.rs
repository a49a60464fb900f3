use crate::error::{ExtractionError, Result};
use crate::printer;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// File extension of Go sources
pub const GO_EXTENSION: &str = "go";

/// File name suffix of Go test files
pub const GO_TEST_SUFFIX: &str = "_test.go";

/// Reusable Go parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser bound to the Go grammar
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ExtractionError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    /// Read and parse a file from disk
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<GoSource> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ExtractionError::io(path, e))?;
        self.parse(path, text)
    }

    /// Parse in-memory source. Any syntax error fails the whole parse.
    pub fn parse(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Result<GoSource> {
        let path = path.into();
        let text = text.into();
        let tree = self
            .parser
            .parse(&text, None)
            .ok_or_else(|| ExtractionError::parse(&path, 0, 0, "parser produced no tree"))?;

        if let Some(bad) = first_error_node(tree.root_node()) {
            let pos = bad.start_position();
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                let snippet: String = text[bad.byte_range()].chars().take(40).collect();
                format!("unexpected `{}`", snippet.trim())
            };
            return Err(ExtractionError::parse(&path, pos.row, pos.column, message));
        }

        Ok(GoSource { path, text, tree })
    }
}

fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

/// A parsed, syntactically valid Go file
pub struct GoSource {
    path: PathBuf,
    text: String,
    tree: Tree,
}

impl GoSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw source text covered by a node
    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    /// Name from the `package` clause
    pub fn package_name(&self) -> Option<&str> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let clause = root
            .named_children(&mut cursor)
            .find(|node| node.kind() == "package_clause")?;
        let mut inner = clause.walk();
        let ident = clause
            .named_children(&mut inner)
            .find(|node| node.kind() == "package_identifier")?;
        Some(self.node_text(ident))
    }

    /// Top-level declarations in file order (package clause and comments excluded)
    pub fn declarations(&self) -> Vec<Declaration<'_>> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter_map(|node| {
                DeclarationKind::from_node_kind(node.kind()).map(|kind| Declaration { node, kind })
            })
            .collect()
    }

    /// Type specs of a `type` declaration, in declaration order
    pub fn type_specs<'t>(&'t self, decl: &Declaration<'t>) -> Vec<TypeSpec<'t>> {
        if decl.kind != DeclarationKind::Type {
            return Vec::new();
        }
        let mut cursor = decl.node.walk();
        let specs: Vec<_> = decl.node.named_children(&mut cursor).collect();
        specs
            .into_iter()
            .filter_map(|spec| {
                let kind = match spec.kind() {
                    "type_alias" => TypeSpecKind::Alias,
                    "type_spec" => match spec.child_by_field_name("type").map(|t| t.kind()) {
                        Some("interface_type") => TypeSpecKind::Interface,
                        Some("struct_type") => TypeSpecKind::Struct,
                        _ => TypeSpecKind::Other,
                    },
                    _ => return None,
                };
                let name = self.node_text(spec.child_by_field_name("name")?);
                Some(TypeSpec { node: spec, name, kind })
            })
            .collect()
    }

    /// `var_spec` nodes of a `var` declaration, grouped form included
    pub fn var_specs<'t>(&'t self, decl: &Declaration<'t>) -> Vec<Node<'t>> {
        if decl.kind != DeclarationKind::Var {
            return Vec::new();
        }
        let mut specs = Vec::new();
        let mut cursor = decl.node.walk();
        for child in decl.node.named_children(&mut cursor) {
            match child.kind() {
                "var_spec" => specs.push(child),
                "var_spec_list" => {
                    let mut inner = child.walk();
                    specs.extend(
                        child
                            .named_children(&mut inner)
                            .filter(|n| n.kind() == "var_spec"),
                    );
                }
                _ => {}
            }
        }
        specs
    }

    /// Name of a function declaration
    pub fn function_name<'t>(&'t self, decl: &Declaration<'t>) -> Option<&'t str> {
        if decl.kind != DeclarationKind::Function {
            return None;
        }
        decl.node
            .child_by_field_name("name")
            .map(|name| self.node_text(name))
    }

    /// Deterministically printed text of a declaration
    pub fn print(&self, node: Node<'_>) -> String {
        printer::print_declaration(self.node_text(node))
    }
}

/// Kind of a top-level Go declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Import,
    Type,
    Var,
    Const,
    Function,
    Method,
}

impl DeclarationKind {
    fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "import_declaration" => Some(Self::Import),
            "type_declaration" => Some(Self::Type),
            "var_declaration" => Some(Self::Var),
            "const_declaration" => Some(Self::Const),
            "function_declaration" => Some(Self::Function),
            "method_declaration" => Some(Self::Method),
            _ => None,
        }
    }
}

/// A top-level declaration node
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'t> {
    pub node: Node<'t>,
    pub kind: DeclarationKind,
}

impl Declaration<'_> {
    /// Byte offset just past the end of the declaration
    pub fn end_offset(&self) -> usize {
        self.node.end_byte()
    }
}

/// Underlying kind of a type spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpecKind {
    Interface,
    Struct,
    Alias,
    Other,
}

/// One `Name <type>` entry of a type declaration
#[derive(Debug, Clone, Copy)]
pub struct TypeSpec<'t> {
    pub node: Node<'t>,
    pub name: &'t str,
    pub kind: TypeSpecKind,
}

/// Check whether a path is a non-test Go source file
pub fn is_go_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let is_go = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == GO_EXTENSION);
    is_go && !name.ends_with(GO_TEST_SUFFIX)
}

/// Derive an entity name from a file name: `user.go` → `User`
pub fn entity_name_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name
        .strip_suffix(".go")
        .unwrap_or(file_name);
    let mut chars = stem.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_syntax_errors() {
        let mut parser = GoParser::new().unwrap();
        let err = parser
            .parse("broken.go", "package infra\n\nfunc broken( {\n")
            .err()
            .expect("syntax error");
        assert!(matches!(err, ExtractionError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_declarations_skip_package_and_comments() {
        let mut parser = GoParser::new().unwrap();
        let source = parser
            .parse(
                "a.go",
                "package infra\n\n// comment\nimport \"fmt\"\n\nvar x = 1\n\nfunc f() { fmt.Println(x) }\n",
            )
            .unwrap();
        assert_eq!(source.package_name(), Some("infra"));
        let kinds: Vec<_> = source.declarations().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeclarationKind::Import,
                DeclarationKind::Var,
                DeclarationKind::Function
            ]
        );
    }

    #[test]
    fn test_grouped_type_specs() {
        let mut parser = GoParser::new().unwrap();
        let source = parser
            .parse(
                "a.go",
                "package infra\n\ntype (\n\tA interface{}\n\tB struct{}\n\tC = int\n\tD []string\n)\n",
            )
            .unwrap();
        let decls = source.declarations();
        let specs: Vec<_> = source
            .type_specs(&decls[0])
            .iter()
            .map(|s| (s.name, s.kind))
            .collect();
        assert_eq!(
            specs,
            vec![
                ("A", TypeSpecKind::Interface),
                ("B", TypeSpecKind::Struct),
                ("C", TypeSpecKind::Alias),
                ("D", TypeSpecKind::Other),
            ]
        );
    }

    #[test]
    fn test_entity_name_from_file_name() {
        assert_eq!(entity_name_from_file_name("user.go").as_deref(), Some("User"));
        assert_eq!(
            entity_name_from_file_name("channelMember.go").as_deref(),
            Some("ChannelMember")
        );
        assert_eq!(entity_name_from_file_name(".go"), None);
    }

    #[test]
    fn test_is_go_source_file() {
        assert!(is_go_source_file(Path::new("pkg/user.go")));
        assert!(!is_go_source_file(Path::new("pkg/user_test.go")));
        assert!(!is_go_source_file(Path::new("pkg/user.rs")));
        assert!(!is_go_source_file(Path::new("pkg/go")));
    }
}
