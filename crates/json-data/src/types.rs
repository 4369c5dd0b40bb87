//! Core types for the annotated JSON tree and its patch operations.

use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

pub use json_data_pointer::{Path, PointerError};

// ── Error ─────────────────────────────────────────────────────────────────

/// Error raised while navigating or patching a tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// Malformed JSON Pointer string.
    #[error(transparent)]
    Pointer(#[from] PointerError),
    /// A path segment is missing, an index is out of range, or a scalar was
    /// reached before the path was exhausted. Carries the compiled pointer.
    #[error("Path not found: {0}")]
    PathNotFound(String),
    /// Semantically invalid operation (removing the root, a missing required
    /// field, moving a value into its own subtree).
    #[error("Invalid patch operation: {0}")]
    InvalidPatch(String),
    /// A `test` operation addressed a path that does not exist.
    #[error("Test failed, path not found")]
    TestPathNotFound,
    /// A `test` operation found a value different from the expected one.
    #[error("Test failed, value differs")]
    TestValueDiffers,
}

// ── Tree node ─────────────────────────────────────────────────────────────

/// A named child slot of an [`JsonNode::Object`] node.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub value: Rc<JsonNode>,
}

/// A node of the annotated JSON tree.
///
/// The tree mirrors the shape of a JSON value exactly; container nodes carry
/// an `expanded` flag on top, which is presentation-only state and does not
/// survive conversion back to JSON.
///
/// Children are held behind [`Rc`] so that every mutation can rebuild only
/// the spine from the root to the touched node and share everything else
/// with the input tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// A scalar or `null`. No children.
    Value { value: Value },
    /// An ordered sequence of uniquely named child slots.
    Object { expanded: bool, props: Vec<Prop> },
    /// An ordered sequence of unnamed children; position is identity.
    Array { expanded: bool, items: Vec<Rc<JsonNode>> },
}

impl JsonNode {
    /// Returns true for object and array nodes.
    pub fn is_container(&self) -> bool {
        !matches!(self, JsonNode::Value { .. })
    }

    /// The `expanded` flag, or `None` for value nodes.
    pub fn expanded(&self) -> Option<bool> {
        match self {
            JsonNode::Value { .. } => None,
            JsonNode::Object { expanded, .. } => Some(*expanded),
            JsonNode::Array { expanded, .. } => Some(*expanded),
        }
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A JSON Patch (RFC 6902) operation.
///
/// Paths are stored structured; the JSON codec translates from and to the
/// pointer-string wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Copy { path: Path, from: Path },
    Move { path: Path, from: Path },
    Test { path: Path, value: Value },
}

impl Op {
    /// Returns the operation name string used on the wire.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Copy { .. } => "copy",
            Op::Move { .. } => "move",
            Op::Test { .. } => "test",
        }
    }

    /// Returns the target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. } => path,
            Op::Remove { path } => path,
            Op::Replace { path, .. } => path,
            Op::Copy { path, .. } => path,
            Op::Move { path, .. } => path,
            Op::Test { path, .. } => path,
        }
    }
}

// ── Result type ───────────────────────────────────────────────────────────

/// Result of applying a full patch with [`patch_data`](crate::patch_data).
///
/// On failure `data` is the original input tree (same allocation), `revert`
/// is empty and `error` carries the failure. On success `error` is `None`
/// and `revert`, applied in order, undoes the patch.
#[derive(Debug, Clone)]
pub struct PatchResult {
    pub data: Rc<JsonNode>,
    pub revert: Vec<Op>,
    pub error: Option<DataError>,
}
