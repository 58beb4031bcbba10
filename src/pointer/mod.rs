//! RFC 6901 JSON Pointer engine
//!
//! Parses, resolves, sets, and deletes values within a JSON tree addressed
//! by structural pointers. Mutating operations are copy-on-write: they
//! return a new tree and never touch their input. Navigation never
//! auto-creates intermediate nodes.

use serde_json::Value;
use thiserror::Error;

use crate::domain::StoreError;

/// Result type for pointer operations
pub type PointerResult<T> = Result<T, PointerError>;

/// Pointer engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// Pointer is neither empty nor `/`-prefixed
    #[error("JSON Pointer must start with '/': {0}")]
    Malformed(String),

    /// A token failed to resolve; carries the full original pointer
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// `set` and `delete` do not operate on the document root
    #[error("cannot {0} the document root")]
    RootOperation(&'static str),
}

impl From<PointerError> for StoreError {
    fn from(e: PointerError) -> Self {
        match e {
            PointerError::PathNotFound(pointer) => StoreError::PathNotFound(pointer),
            PointerError::Malformed(_) | PointerError::RootOperation(_) => {
                StoreError::InvalidOperation(e.to_string())
            }
        }
    }
}

/// Parses a pointer into its unescaped reference tokens.
///
/// The empty pointer denotes the root and parses to no tokens. Every other
/// pointer must start with `/`. Escapes are decoded by substituting `~1`
/// with `/` and then `~0` with `~`, so the raw token `~01` decodes to `~1`.
///
/// # Examples
///
/// ```
/// use nodestore::pointer::parse;
///
/// assert_eq!(parse("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse("/a/b").unwrap(), vec!["a", "b"]);
/// assert_eq!(parse("/a~1b").unwrap(), vec!["a/b"]);
/// assert!(parse("no-leading-slash").is_err());
/// ```
pub fn parse(pointer: &str) -> PointerResult<Vec<String>> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }

    if !pointer.starts_with('/') {
        return Err(PointerError::Malformed(pointer.to_string()));
    }

    Ok(pointer[1..]
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// Escapes a single reference token for embedding in a pointer.
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Resolves a pointer to the value it addresses.
///
/// The empty pointer returns the whole document. At a sequence the token
/// must parse as an in-bounds non-negative index; at a map it must be an
/// existing key; a scalar with tokens remaining fails. Failures carry the
/// full original pointer string.
pub fn resolve<'a>(document: &'a Value, pointer: &str) -> PointerResult<&'a Value> {
    let tokens = parse(pointer)?;
    let mut current = document;

    for token in &tokens {
        current = step(current, token)
            .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
    }

    Ok(current)
}

/// Mutable variant of [`resolve`], walking the same rules.
pub fn resolve_mut<'a>(document: &'a mut Value, pointer: &str) -> PointerResult<&'a mut Value> {
    let tokens = parse(pointer)?;
    let mut current = document;

    for token in &tokens {
        current = step_mut(current, token)
            .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
    }

    Ok(current)
}

/// Returns a copy of `document` with `value` written at `pointer`.
///
/// The root pointer is rejected: the root cannot be replaced through this
/// operation. Intermediate nodes are never created. At the final step a
/// sequence parent requires an in-bounds index (replace); a map parent
/// accepts new and existing keys alike.
pub fn set(document: &Value, pointer: &str, value: Value) -> PointerResult<Value> {
    let tokens = parse(pointer)?;
    let Some((last, parents)) = tokens.split_last() else {
        return Err(PointerError::RootOperation("replace"));
    };

    let mut next = document.clone();
    let parent = walk_mut(&mut next, parents, pointer)?;

    match parent {
        Value::Array(items) => {
            let index = sequence_index(last, items.len())
                .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
            items[index] = value;
        }
        Value::Object(map) => {
            map.insert(last.clone(), value);
        }
        _ => return Err(PointerError::PathNotFound(pointer.to_string())),
    }

    Ok(next)
}

/// Returns a copy of `document` with the node at `pointer` removed.
///
/// The root pointer is rejected. A sequence parent requires an in-bounds
/// index (subsequent elements shift down); a map parent requires an existing
/// key. The removed value is not returned; resolve it first if needed.
pub fn delete(document: &Value, pointer: &str) -> PointerResult<Value> {
    let tokens = parse(pointer)?;
    let Some((last, parents)) = tokens.split_last() else {
        return Err(PointerError::RootOperation("delete"));
    };

    let mut next = document.clone();
    let parent = walk_mut(&mut next, parents, pointer)?;

    match parent {
        Value::Array(items) => {
            let index = sequence_index(last, items.len())
                .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
            items.remove(index);
        }
        Value::Object(map) => {
            map.remove(last.as_str())
                .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
        }
        _ => return Err(PointerError::PathNotFound(pointer.to_string())),
    }

    Ok(next)
}

/// Single navigation step; `None` on any rule violation.
fn step<'a>(current: &'a Value, token: &str) -> Option<&'a Value> {
    match current {
        Value::Array(items) => items.get(sequence_index(token, items.len())?),
        Value::Object(map) => map.get(token),
        _ => None,
    }
}

fn step_mut<'a>(current: &'a mut Value, token: &str) -> Option<&'a mut Value> {
    match current {
        Value::Array(items) => {
            let index = sequence_index(token, items.len())?;
            items.get_mut(index)
        }
        Value::Object(map) => map.get_mut(token),
        _ => None,
    }
}

/// Walks to the parent of the final token, sharing resolve's rules.
fn walk_mut<'a>(
    document: &'a mut Value,
    parents: &[String],
    pointer: &str,
) -> PointerResult<&'a mut Value> {
    let mut current = document;
    for token in parents {
        current = step_mut(current, token)
            .ok_or_else(|| PointerError::PathNotFound(pointer.to_string()))?;
    }
    Ok(current)
}

/// Parses a token as an in-bounds sequence index. Negative numbers and
/// non-numeric tokens fail to parse and therefore resolve to `None`.
fn sequence_index(token: &str, len: usize) -> Option<usize> {
    token.parse::<usize>().ok().filter(|&index| index < len)
}
