//! The patch engine: applies an ordered list of JSON Patch operations to a
//! tree, accumulating the inverse operation list as it goes.
//!
//! Processing is transactional per call. Operations are applied one at a
//! time in list order; each successful operation prepends its inverse to the
//! revert list, so the revert list read in order undoes the patch (a LIFO
//! undo stack, built without a final reversal). The first failure aborts the
//! whole batch: the original tree is handed back untouched, the revert list
//! is empty and the error is surfaced.

use std::rc::Rc;

use serde_json::Value;

use json_data_pointer::{is_child, is_path_equal};

use crate::navigate;
use crate::tree::{data_to_json, json_to_data, path_exists};
use crate::types::{DataError, JsonNode, Op, PatchResult};

// Subtrees created by a patch start out collapsed.
fn expand_never(_path: &[String]) -> bool {
    false
}

/// Apply `ops` to `node`, returning the patched tree and the revert patch.
///
/// On failure the returned `data` is the input tree itself (the same
/// allocation, not a copy), `revert` is empty and `error` carries the
/// failure. On success `error` is `None` and applying `revert` to the
/// patched tree restores the original value content.
pub fn patch_data(node: &Rc<JsonNode>, ops: &[Op]) -> PatchResult {
    let mut data = Rc::clone(node);
    let mut revert: Vec<Op> = Vec::new();

    for op in ops {
        match apply_op(&data, op) {
            Ok((updated, inverse)) => {
                data = updated;
                // Prepend as a group, preserving in-group order
                for inverse_op in inverse.into_iter().rev() {
                    revert.insert(0, inverse_op);
                }
            }
            Err(error) => {
                return PatchResult {
                    data: Rc::clone(node),
                    revert: Vec::new(),
                    error: Some(error),
                };
            }
        }
    }

    PatchResult {
        data,
        revert,
        error: None,
    }
}

/// Apply a single operation, returning the updated tree and the zero, one or
/// two operations that undo it.
fn apply_op(data: &Rc<JsonNode>, op: &Op) -> Result<(Rc<JsonNode>, Vec<Op>), DataError> {
    match op {
        Op::Add { path, value } => {
            let (updated, revert) = apply_add(data, path, value)?;
            Ok((updated, vec![revert]))
        }
        Op::Remove { path } => {
            let old = navigate::resolve(data, path)?;
            let updated = navigate::remove(data, path)?;
            let revert = Op::Add {
                path: path.clone(),
                value: data_to_json(&old),
            };
            Ok((updated, vec![revert]))
        }
        Op::Replace { path, value } => {
            let old = navigate::resolve(data, path)?;
            let child = json_to_data(path, value, &expand_never);
            let updated = navigate::replace(data, path, child)?;
            let revert = Op::Replace {
                path: path.clone(),
                value: data_to_json(&old),
            };
            Ok((updated, vec![revert]))
        }
        Op::Copy { path, from } => {
            let source = navigate::resolve(data, from)?;
            let (updated, revert) = apply_add(data, path, &data_to_json(&source))?;
            Ok((updated, vec![revert]))
        }
        Op::Move { path, from } => apply_move(data, path, from),
        Op::Test { path, value } => {
            let node =
                navigate::resolve(data, path).map_err(|_| DataError::TestPathNotFound)?;
            if data_to_json(&node) != *value {
                return Err(DataError::TestValueDiffers);
            }
            Ok((Rc::clone(data), Vec::new()))
        }
    }
}

// Add semantics shared by `add`, `copy` and the destination half of `move`.
// A trailing append marker is resolved to an explicit index first, so the
// emitted revert always addresses a concrete location.
fn apply_add(
    data: &Rc<JsonNode>,
    path: &[String],
    value: &Value,
) -> Result<(Rc<JsonNode>, Op), DataError> {
    let resolved = navigate::resolve_path_index(data, path)?;
    if resolved.is_empty() {
        let old = data_to_json(data);
        let updated = json_to_data(&[], value, &expand_never);
        return Ok((
            updated,
            Op::Replace {
                path: Vec::new(),
                value: old,
            },
        ));
    }

    let parent_path = &resolved[..resolved.len() - 1];
    let parent = navigate::resolve(data, parent_path)?;

    // Only an object parent can be overwritten by add; an array parent
    // always inserts.
    let revert = match parent.as_ref() {
        JsonNode::Object { .. } if path_exists(data, &resolved) => {
            let old = navigate::resolve(data, &resolved)?;
            Op::Replace {
                path: resolved.clone(),
                value: data_to_json(&old),
            }
        }
        _ => Op::Remove {
            path: resolved.clone(),
        },
    };

    let child = json_to_data(&resolved, value, &expand_never);
    let updated = navigate::insert(data, &resolved, child)?;
    Ok((updated, revert))
}

fn apply_move(
    data: &Rc<JsonNode>,
    path: &[String],
    from: &[String],
) -> Result<(Rc<JsonNode>, Vec<Op>), DataError> {
    if is_path_equal(path, from) {
        return Ok((Rc::clone(data), Vec::new()));
    }
    if is_child(from, path) {
        return Err(DataError::InvalidPatch(
            "cannot move a value into its own subtree".to_string(),
        ));
    }

    let source = navigate::resolve(data, from)?;
    let removed = navigate::remove(data, from)?;
    let (updated, add_revert) = apply_add(&removed, path, &data_to_json(&source))?;

    // The add revert carries the destination with any append marker already
    // resolved against the post-removal tree.
    let (destination, overwritten) = match add_revert {
        Op::Replace { path, value } => (path, Some(value)),
        Op::Remove { path } => (path, None),
        _ => unreachable!("add reverts are replace or remove"),
    };

    let mut revert = vec![Op::Move {
        from: destination.clone(),
        path: from.to_vec(),
    }];
    if let Some(value) = overwritten {
        // Restore the overwritten value only after the structural move has
        // been undone.
        revert.push(Op::Add {
            path: destination,
            value,
        });
    }
    Ok((updated, revert))
}
