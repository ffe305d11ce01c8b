//! Go declaration extractor.
//!
//! Walks the tree-sitter syntax tree and reports every `var` spec with its
//! names, explicit type and whether it sits at file scope. Files that do not
//! parse cleanly are rejected rather than partially extracted.

use super::interface::{DeclarationExtractor, SourceDecls, VarDecl};
use super::lang::language as go_language;
use crate::errors::{Error, Result};
use tree_sitter::{Node, Parser, Tree};

// ----- Grammar knobs for tree-sitter-go -----

const SOURCE_FILE: &str = "source_file";
const PACKAGE_CLAUSE: &str = "package_clause";
const PACKAGE_IDENTIFIER: &str = "package_identifier";
const VAR_DECLARATION: &str = "var_declaration";
const VAR_SPEC: &str = "var_spec";
// Newer grammar releases wrap parenthesized groups in `var_spec_list`.
const VAR_SPEC_LIST: &str = "var_spec_list";

const FIELD_NAME: &str = "name";
const FIELD_TYPE: &str = "type";

/// Go declaration extractor backed by tree-sitter-go.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoAst;

impl GoAst {
    /// Parse source code into a Tree-sitter `Tree`.
    ///
    /// Errors:
    /// - `Error::TreeSitterLanguage` if language cannot be set;
    /// - `Error::TreeSitterParse` if parsing returns `None`.
    #[inline]
    fn parse(code: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        let lang = go_language();
        parser
            .set_language(&lang)
            .map_err(|_| Error::TreeSitterLanguage)?;
        parser.parse(code, None).ok_or(Error::TreeSitterParse)
    }
}

impl DeclarationExtractor for GoAst {
    fn extract(&self, code: &str) -> Result<SourceDecls> {
        let tree = Self::parse(code)?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root);
            let pos = at.start_position();
            return Err(Error::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        let package = package_name(root, code).ok_or(Error::MissingPackage)?;

        let mut vars = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == VAR_DECLARATION {
                let top_level = node.parent().is_some_and(|p| p.kind() == SOURCE_FILE);
                collect_var_specs(node, code, top_level, &mut vars);
            }
            let mut w = node.walk();
            for ch in node.named_children(&mut w) {
                stack.push(ch);
            }
        }
        vars.sort_by_key(|v| v.offset);

        Ok(SourceDecls { package, vars })
    }
}

// ---------- small helpers ----------

#[inline]
fn read_text(code: &str, n: Node) -> String {
    n.utf8_text(code.as_bytes()).unwrap_or_default().to_string()
}

/// First error or missing node in document order.
fn first_error(n: Node) -> Option<Node> {
    if n.is_error() || n.is_missing() {
        return Some(n);
    }
    if !n.has_error() {
        return None;
    }
    let mut w = n.walk();
    let found = n.children(&mut w).find_map(first_error);
    found
}

fn package_name(root: Node, code: &str) -> Option<String> {
    let mut w = root.walk();
    let clause = root
        .named_children(&mut w)
        .find(|ch| ch.kind() == PACKAGE_CLAUSE)?;
    let mut cw = clause.walk();
    let ident = clause
        .named_children(&mut cw)
        .find(|ch| ch.kind() == PACKAGE_IDENTIFIER)?;
    let name = read_text(code, ident);
    (!name.is_empty()).then_some(name)
}

/// `var x T` and `var ( ... )` both end up here.
fn collect_var_specs(decl: Node, code: &str, top_level: bool, out: &mut Vec<VarDecl>) {
    let mut w = decl.walk();
    for ch in decl.named_children(&mut w) {
        match ch.kind() {
            VAR_SPEC => push_var_spec(ch, code, top_level, out),
            VAR_SPEC_LIST => {
                let mut lw = ch.walk();
                for spec in ch.named_children(&mut lw) {
                    if spec.kind() == VAR_SPEC {
                        push_var_spec(spec, code, top_level, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_var_spec(spec: Node, code: &str, top_level: bool, out: &mut Vec<VarDecl>) {
    let declared_type = spec
        .child_by_field_name(FIELD_TYPE)
        .map(|t| read_text(code, t));
    let mut w = spec.walk();
    for name in spec.children_by_field_name(FIELD_NAME, &mut w) {
        out.push(VarDecl {
            name: read_text(code, name),
            declared_type: declared_type.clone(),
            top_level,
            offset: name.start_byte(),
        });
    }
}
