//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate implements helper functions for [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901):
//! parsing pointer strings into path segments, compiling paths back into
//! pointer strings, and a handful of path predicates used when navigating
//! a document.
//!
//! Segments stay plain strings after parsing. Whether a segment addresses an
//! object key or an array index is decided contextually by the caller, which
//! is the only place where the shape of the document is known.
//!
//! # Example
//!
//! ```
//! use json_data_pointer::{parse_json_pointer, compile_json_pointer};
//!
//! let path = parse_json_pointer("/foo/bar").unwrap();
//! assert_eq!(path, vec!["foo".to_string(), "bar".to_string()]);
//!
//! let pointer = compile_json_pointer(&path);
//! assert_eq!(pointer, "/foo/bar");
//! ```

use thiserror::Error;

/// A step in a JSON Pointer path: an object key, a stringified array index,
/// or the append marker `-`.
pub type PathStep = String;

/// A JSON Pointer path. The empty path denotes the document root.
pub type Path = Vec<PathStep>;

/// The array-append marker segment, meaning "one past the last index".
pub const APPEND: &str = "-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// The pointer string is non-empty and does not start with `/`.
    #[error("Invalid JSON pointer: {0}")]
    Syntax(String),
    /// The root path has no parent.
    #[error("Root path has no parent")]
    NoParent,
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use json_data_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("no-escapes"), "no-escapes");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// Per RFC 6901, `~` is replaced with `~0` and `/` is replaced with `~1`.
///
/// # Example
///
/// ```
/// use json_data_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path components.
///
/// - The empty string is the root and returns the empty path.
/// - A non-empty pointer must start with `/`, otherwise
///   [`PointerError::Syntax`] is returned.
/// - Each component after the leading `/` is unescaped. Numeric-looking
///   components are not converted to integers here.
///
/// # Example
///
/// ```
/// use json_data_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/foo/bar").unwrap(), vec!["foo", "bar"]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("foo").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PointerError::Syntax(pointer.to_string()));
    }
    Ok(pointer[1..].split('/').map(unescape_component).collect())
}

/// Compile path components into a JSON Pointer string.
///
/// Returns the empty string for the root path (empty components).
///
/// # Example
///
/// ```
/// use json_data_pointer::compile_json_pointer;
///
/// assert_eq!(compile_json_pointer(&[]), "");
/// assert_eq!(
///     compile_json_pointer(&["foo".to_string(), "bar".to_string()]),
///     "/foo/bar"
/// );
/// ```
pub fn compile_json_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

/// Check if `parent` path strictly contains the `child` path.
///
/// # Example
///
/// ```
/// use json_data_pointer::is_child;
///
/// let parent = vec!["foo".to_string()];
/// let child = vec!["foo".to_string(), "bar".to_string()];
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// assert!(!is_child(&parent, &parent));
/// ```
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    if parent.len() >= child.len() {
        return false;
    }
    for i in 0..parent.len() {
        if parent[i] != child[i] {
            return false;
        }
    }
    true
}

/// Check if two paths are equal.
pub fn is_path_equal(p1: &[String], p2: &[String]) -> bool {
    if p1.len() != p2.len() {
        return false;
    }
    for i in 0..p1.len() {
        if p1[i] != p2[i] {
            return false;
        }
    }
    true
}

/// Get the parent path of a given path.
///
/// # Errors
///
/// Returns [`PointerError::NoParent`] if the path is the root.
pub fn parent(path: &[String]) -> Result<Path, PointerError> {
    if path.is_empty() {
        return Err(PointerError::NoParent);
    }
    Ok(path[..path.len() - 1].to_vec())
}

/// Check if a string represents a valid non-negative integer array index.
///
/// Leading zeros are rejected except for `"0"` itself, per RFC 6901.
///
/// # Example
///
/// ```
/// use json_data_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
