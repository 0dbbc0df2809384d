//! Typed syntax tree for Python node scripts
//!
//! Global invariants enforced:
//! - Lowering preserves source order, so a pre-order walk of the typed tree
//!   matches a pre-order walk of the concrete parse tree
//! - Formatting, comments, and whitespace must not affect results

use crate::error::ExtractError;
use crate::span::SourceSpan;
use tree_sitter::{Node, Parser};

/// Parsed script, root statements in source order
#[derive(Debug, Clone)]
pub struct Module {
    pub body: Vec<ScriptNode>,
}

/// Tagged representation of the node kinds that matter for signature
/// extraction. Every other kind becomes `Other` with its children preserved
/// in source order.
#[derive(Debug, Clone)]
pub enum ScriptNode {
    FunctionDef(FunctionDef),
    Return(ReturnStmt),
    Other(Vec<ScriptNode>),
}

/// A `def` (or `async def`) statement
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    /// Positional parameter names in declaration order
    pub params: Vec<String>,
    pub span: SourceSpan,
    pub body: Vec<ScriptNode>,
}

/// A `return` statement
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: ReturnValue,
    pub span: SourceSpan,
}

/// Shape of the value a return statement yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnValue {
    /// `return` with no expression
    Bare,
    /// A single non-tuple expression
    Expr,
    /// Tuple literal or bare expression list, with element count
    Tuple(usize),
}

/// Parse source text into a typed module
///
/// tree-sitter recovers from syntax errors rather than failing, so the parse
/// tree is checked for ERROR and MISSING nodes and rejected before lowering.
pub fn parse_module(source: &str) -> Result<Module, ExtractError> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| ExtractError::Parser(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::Parser("no parse tree produced".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(ExtractError::Syntax { line });
    }

    Ok(Module {
        body: lower_children(root, source),
    })
}

/// Find the 1-indexed line of the first ERROR or MISSING node, pre-order
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        // has_error is true on any ancestor of an error, so subtrees without
        // it cannot contain the node we want
        if child.has_error() {
            if let Some(line) = first_error_line(child) {
                return Some(line);
            }
        }
    }
    None
}

fn lower_children(node: Node, source: &str) -> Vec<ScriptNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .map(|child| lower_node(child, source))
        .collect()
}

fn lower_node(node: Node, source: &str) -> ScriptNode {
    match node.kind() {
        "function_definition" | "async_function_definition" => {
            ScriptNode::FunctionDef(lower_function(node, source))
        }
        "return_statement" => ScriptNode::Return(lower_return(node)),
        _ => ScriptNode::Other(lower_children(node, source)),
    }
}

fn lower_function(node: Node, source: &str) -> FunctionDef {
    let name = node
        .child_by_field_name("name")
        .map(|n| source[n.byte_range()].to_string())
        .unwrap_or_default();

    let params = node
        .child_by_field_name("parameters")
        .map(|p| positional_params(p, source))
        .unwrap_or_default();

    let body = node
        .child_by_field_name("body")
        .map(|b| lower_children(b, source))
        .unwrap_or_default();

    FunctionDef {
        name,
        params,
        span: SourceSpan::from(node),
        body,
    }
}

/// Collect declared positional slots: plain, typed, and defaulted parameters.
/// `*args`, `**kwargs`, and everything after a bare `*` bind by splat or by
/// keyword, never by position.
fn positional_params(node: Node, source: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => params.push(source[child.byte_range()].to_string()),
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = parameter_name(child, source) {
                    params.push(name);
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            // positional_separator ("/") and comments carry no slot
            _ => {}
        }
    }
    params
}

/// Parameter name of a typed/defaulted parameter node
fn parameter_name(node: Node, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(source[name.byte_range()].to_string());
    }
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "identifier")
        .map(|c| source[c.byte_range()].to_string());
    result
}

fn lower_return(node: Node) -> ReturnStmt {
    let mut cursor = node.walk();
    let value = match node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")
    {
        None => ReturnValue::Bare,
        // `return a, b` is an expression_list; `return (a, b)` is a tuple
        Some(expr) => match expr.kind() {
            "tuple" | "expression_list" => ReturnValue::Tuple(tuple_len(expr)),
            _ => ReturnValue::Expr,
        },
    };
    ReturnStmt {
        value,
        span: SourceSpan::from(node),
    }
}

fn tuple_len(node: Node) -> usize {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .count()
}
