//! Signature extraction for the `execute` entry point
//!
//! Global invariants enforced:
//! - Traversal is pre-order depth-first and stops at the first match
//! - No state is carried between calls; identical input yields identical
//!   results

use crate::ast::{self, FunctionDef, Module, ReturnStmt, ReturnValue, ScriptNode};
use crate::error::ExtractError;
use std::path::Path;

/// Name of the function every node script must define
pub const ENTRY_POINT: &str = "execute";

/// Extracted signature: declared positional slots and return arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub param_count: usize,
    pub return_count: usize,
}

impl From<Signature> for (usize, usize) {
    fn from(sig: Signature) -> Self {
        (sig.param_count, sig.return_count)
    }
}

/// Extract the `execute` signature from source text
///
/// Fails with a syntax error for malformed source, or with the fixed
/// "Function execute not found." / "No return statement found." messages
/// when the contract elements are missing.
pub fn extract(source: &str) -> Result<Signature, ExtractError> {
    let module = ast::parse_module(source)?;
    let function = locate_entry_point(&module)?;
    signature_of(function)
}

/// Read a script file and extract its `execute` signature
///
/// A missing path fails with "File not found: {path}". Every other failure,
/// including the ones raised by [`extract`], is re-wrapped into
/// "Error when parsing: {original message}".
pub fn extract_from_file(path: &Path) -> Result<Signature, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::FileNotFound(path.display().to_string()));
    }

    // read_to_string opens and fully drains the file; the handle is released
    // on success and on error alike
    let source = std::fs::read_to_string(path)
        .map_err(|e| ExtractError::Wrapped(e.to_string()))?;

    extract(&source).map_err(|e| ExtractError::Wrapped(e.to_string()))
}

/// Locate the entry-point definition in a parsed module
///
/// Pre-order depth-first over every node, nested definitions included; the
/// first definition named `execute` wins.
pub fn locate_entry_point(module: &Module) -> Result<&FunctionDef, ExtractError> {
    find_function(&module.body, ENTRY_POINT).ok_or(ExtractError::ExecuteNotFound)
}

/// Compute the signature of an already-located definition
pub fn signature_of(function: &FunctionDef) -> Result<Signature, ExtractError> {
    let ret = first_return(&function.body).ok_or(ExtractError::ReturnNotFound)?;
    Ok(Signature {
        param_count: function.params.len(),
        return_count: return_arity(ret),
    })
}

/// Number of values a return statement yields
///
/// A bare `return` counts as one value, exactly like a single expression.
fn return_arity(ret: &ReturnStmt) -> usize {
    match ret.value {
        ReturnValue::Tuple(n) => n,
        ReturnValue::Expr | ReturnValue::Bare => 1,
    }
}

fn find_function<'a>(nodes: &'a [ScriptNode], name: &str) -> Option<&'a FunctionDef> {
    for node in nodes {
        match node {
            ScriptNode::FunctionDef(def) => {
                if def.name == name {
                    return Some(def);
                }
                if let Some(found) = find_function(&def.body, name) {
                    return Some(found);
                }
            }
            ScriptNode::Other(children) => {
                if let Some(found) = find_function(children, name) {
                    return Some(found);
                }
            }
            ScriptNode::Return(_) => {}
        }
    }
    None
}

/// First return statement in the subtree, pre-order, nested blocks and
/// nested definitions included. Later returns with a different arity are
/// never consulted.
fn first_return(nodes: &[ScriptNode]) -> Option<&ReturnStmt> {
    for node in nodes {
        match node {
            ScriptNode::Return(ret) => return Some(ret),
            ScriptNode::FunctionDef(def) => {
                if let Some(found) = first_return(&def.body) {
                    return Some(found);
                }
            }
            ScriptNode::Other(children) => {
                if let Some(found) = first_return(children) {
                    return Some(found);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_and_tuple_return() {
        let source = r#"
def execute(a, b, c):
    return (1, 2)
"#;
        let sig = extract(source).unwrap();
        assert_eq!(<(usize, usize)>::from(sig), (3, 2));
    }

    #[test]
    fn test_no_params_single_return() {
        let source = r#"
def execute():
    return 1
"#;
        assert_eq!(extract(source).unwrap(), Signature { param_count: 0, return_count: 1 });
    }

    #[test]
    fn test_bare_return_counts_as_one_value() {
        let source = r#"
def execute(x):
    return
"#;
        assert_eq!(extract(source).unwrap(), Signature { param_count: 1, return_count: 1 });
    }

    #[test]
    fn test_unparenthesized_tuple_return() {
        let source = r#"
def execute(state):
    return state, 0, "done"
"#;
        assert_eq!(extract(source).unwrap(), Signature { param_count: 1, return_count: 3 });
    }

    #[test]
    fn test_missing_execute() {
        let source = r#"
def setup():
    return 1
"#;
        let err = extract(source).unwrap_err();
        assert_eq!(err, ExtractError::ExecuteNotFound);
        assert_eq!(err.to_string(), "Function execute not found.");
    }

    #[test]
    fn test_missing_return() {
        let source = r#"
def execute(a):
    x = a + 1
"#;
        let err = extract(source).unwrap_err();
        assert_eq!(err, ExtractError::ReturnNotFound);
        assert_eq!(err.to_string(), "No return statement found.");
    }

    #[test]
    fn test_invalid_source_is_a_syntax_error_not_a_lookup_error() {
        let err = extract("def execute(:\n").unwrap_err();
        assert!(matches!(err, ExtractError::Syntax { .. }));
    }

    #[test]
    fn test_first_definition_wins() {
        let source = r#"
class Node:
    def execute(self, a):
        return 1, 2

def execute(x, y, z):
    return 1
"#;
        // the method comes first in pre-order, even though a module-level
        // definition follows
        assert_eq!(extract(source).unwrap(), Signature { param_count: 2, return_count: 2 });
    }

    #[test]
    fn test_first_return_wins_in_preorder() {
        let source = r#"
def execute(a):
    if a:
        return 1, 2, 3
    return 1
"#;
        // the nested return is encountered first; the shallower one later in
        // the source is ignored
        assert_eq!(extract(source).unwrap().return_count, 3);
    }

    #[test]
    fn test_return_inside_loop_is_found() {
        let source = r#"
def execute(items):
    for item in items:
        if item:
            return item, None
"#;
        assert_eq!(extract(source).unwrap(), Signature { param_count: 1, return_count: 2 });
    }

    #[test]
    fn test_return_in_nested_definition_is_consulted() {
        let source = r#"
def execute(a):
    def helper():
        return 1, 2
    helper()
"#;
        // pre-order over the whole subtree includes nested definitions
        assert_eq!(extract(source).unwrap().return_count, 2);
    }

    #[test]
    fn test_execute_found_inside_class_only() {
        let source = r#"
class Runner:
    def execute(self):
        return "ok"
"#;
        assert_eq!(extract(source).unwrap(), Signature { param_count: 1, return_count: 1 });
    }

    #[test]
    fn test_empty_tuple_return() {
        let source = r#"
def execute():
    return ()
"#;
        assert_eq!(extract(source).unwrap().return_count, 0);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let source = r#"
def execute(a, b):
    return a, b
"#;
        assert_eq!(extract(source).unwrap(), extract(source).unwrap());
    }
}
