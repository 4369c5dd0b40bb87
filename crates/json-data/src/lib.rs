//! Editable, annotated JSON tree with reversible JSON Patch application.
//!
//! A raw JSON value is converted into a tree of tagged nodes
//! (`value`/`object`/`array`) that carries per-container presentation state
//! (the `expanded` flag) alongside the value itself. Ordered lists of
//! [JSON Patch (RFC 6902)](https://tools.ietf.org/html/rfc6902) operations
//! are applied to that tree, producing both the mutated tree and a patch
//! that exactly undoes the mutation.
//!
//! Trees are immutable values: every mutation returns a new root that shares
//! untouched subtrees with its input, and a no-op returns the input itself.
//! Patch application is transactional per call; the first failing operation
//! aborts the whole batch and hands the original tree back.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use json_data::{json_to_data, data_to_json, patch_data, patch_from_json};
//!
//! let data = json_to_data(&[], &json!({"arr": [1, 2, 3]}), &|_| false);
//!
//! let patch = patch_from_json(&json!([
//!     {"op": "add", "path": "/arr/-", "value": 4}
//! ])).unwrap();
//!
//! let result = patch_data(&data, &patch);
//! assert!(result.error.is_none());
//! assert_eq!(data_to_json(&result.data), json!({"arr": [1, 2, 3, 4]}));
//!
//! // Applying the revert patch restores the original document
//! let undone = patch_data(&result.data, &result.revert);
//! assert_eq!(data_to_json(&undone.data), json!({"arr": [1, 2, 3]}));
//! ```

pub mod codec;
pub mod navigate;
pub mod patch;
pub mod tree;
pub mod types;

pub use codec::{op_from_json, op_to_json, patch_from_json, patch_to_json};
pub use patch::patch_data;
pub use tree::{data_to_json, expand_path, expand_where, json_to_data, path_exists};
pub use types::{DataError, JsonNode, Op, PatchResult, Prop};

pub use json_data_pointer::{
    compile_json_pointer, parse_json_pointer, Path, PathStep, PointerError,
};
