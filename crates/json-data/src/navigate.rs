//! Structured-path navigation over the annotated tree: read, insert,
//! replace and remove access.
//!
//! All functions are pure with respect to the input tree. Mutating forms
//! return a new root that rebuilds only the spine from the root to the
//! touched node and shares every other subtree with the input.

use std::rc::Rc;

use json_data_pointer::{compile_json_pointer, is_valid_index, APPEND};

use crate::types::{DataError, JsonNode, Path, Prop};

fn not_found(path: &[String]) -> DataError {
    DataError::PathNotFound(compile_json_pointer(path))
}

/// Resolve `path` to the node it addresses.
///
/// The empty path resolves to `node` itself.
pub fn resolve(node: &Rc<JsonNode>, path: &[String]) -> Result<Rc<JsonNode>, DataError> {
    let mut current = Rc::clone(node);
    for step in path {
        let next = match current.as_ref() {
            JsonNode::Object { props, .. } => props
                .iter()
                .find(|prop| prop.name == *step)
                .map(|prop| Rc::clone(&prop.value)),
            JsonNode::Array { items, .. } => {
                if is_valid_index(step) {
                    step.parse::<usize>()
                        .ok()
                        .and_then(|index| items.get(index).map(Rc::clone))
                } else {
                    None
                }
            }
            JsonNode::Value { .. } => None,
        };
        current = next.ok_or_else(|| not_found(path))?;
    }
    Ok(current)
}

/// Resolve a trailing append marker against the current tree.
///
/// When the final segment is `-` and its parent is an array, the marker is
/// replaced with the array's current length, so the returned path carries an
/// explicit index. Any other path is returned unchanged.
pub fn resolve_path_index(node: &Rc<JsonNode>, path: &[String]) -> Result<Path, DataError> {
    match path.split_last() {
        Some((last, parent_path)) if last == APPEND => {
            let parent = resolve(node, parent_path)?;
            match parent.as_ref() {
                JsonNode::Array { items, .. } => {
                    let mut resolved = parent_path.to_vec();
                    resolved.push(items.len().to_string());
                    Ok(resolved)
                }
                _ => Ok(path.to_vec()),
            }
        }
        _ => Ok(path.to_vec()),
    }
}

/// Insert `child` at `path` (add semantics).
///
/// An object parent inserts or overwrites the named slot, keeping its
/// position on overwrite and appending on a new name. An array parent
/// requires an integer index `0 <= i <= len` (inserting shifts subsequent
/// elements right) or the append marker `-`. The empty path replaces the
/// root.
pub fn insert(
    node: &Rc<JsonNode>,
    path: &[String],
    child: Rc<JsonNode>,
) -> Result<Rc<JsonNode>, DataError> {
    insert_at(node, path, path, child)
}

fn insert_at(
    node: &Rc<JsonNode>,
    full_path: &[String],
    path: &[String],
    child: Rc<JsonNode>,
) -> Result<Rc<JsonNode>, DataError> {
    let Some((step, rest)) = path.split_first() else {
        return Ok(child);
    };
    match node.as_ref() {
        JsonNode::Object { expanded, props } => {
            if rest.is_empty() {
                let mut props = props.clone();
                match props.iter().position(|prop| prop.name == *step) {
                    Some(index) => {
                        props[index] = Prop {
                            name: step.clone(),
                            value: child,
                        }
                    }
                    None => props.push(Prop {
                        name: step.clone(),
                        value: child,
                    }),
                }
                Ok(Rc::new(JsonNode::Object {
                    expanded: *expanded,
                    props,
                }))
            } else {
                let index = props
                    .iter()
                    .position(|prop| prop.name == *step)
                    .ok_or_else(|| not_found(full_path))?;
                let value = insert_at(&props[index].value, full_path, rest, child)?;
                let mut props = props.clone();
                props[index] = Prop {
                    name: step.clone(),
                    value,
                };
                Ok(Rc::new(JsonNode::Object {
                    expanded: *expanded,
                    props,
                }))
            }
        }
        JsonNode::Array { expanded, items } => {
            if rest.is_empty() {
                let index = if step == APPEND {
                    items.len()
                } else {
                    parse_index(step, full_path)?
                };
                if index > items.len() {
                    return Err(not_found(full_path));
                }
                let mut items = items.clone();
                items.insert(index, child);
                Ok(Rc::new(JsonNode::Array {
                    expanded: *expanded,
                    items,
                }))
            } else {
                let index = parse_index(step, full_path)?;
                let current = items.get(index).ok_or_else(|| not_found(full_path))?;
                let item = insert_at(current, full_path, rest, child)?;
                let mut items = items.clone();
                items[index] = item;
                Ok(Rc::new(JsonNode::Array {
                    expanded: *expanded,
                    items,
                }))
            }
        }
        JsonNode::Value { .. } => Err(not_found(full_path)),
    }
}

/// Replace the node at `path` with `child`.
///
/// The path must already resolve; the object key or array index is left
/// unchanged. The empty path replaces the root.
pub fn replace(
    node: &Rc<JsonNode>,
    path: &[String],
    child: Rc<JsonNode>,
) -> Result<Rc<JsonNode>, DataError> {
    replace_at(node, path, path, child)
}

fn replace_at(
    node: &Rc<JsonNode>,
    full_path: &[String],
    path: &[String],
    child: Rc<JsonNode>,
) -> Result<Rc<JsonNode>, DataError> {
    let Some((step, rest)) = path.split_first() else {
        return Ok(child);
    };
    match node.as_ref() {
        JsonNode::Object { expanded, props } => {
            let index = props
                .iter()
                .position(|prop| prop.name == *step)
                .ok_or_else(|| not_found(full_path))?;
            let value = if rest.is_empty() {
                child
            } else {
                replace_at(&props[index].value, full_path, rest, child)?
            };
            let mut props = props.clone();
            props[index] = Prop {
                name: step.clone(),
                value,
            };
            Ok(Rc::new(JsonNode::Object {
                expanded: *expanded,
                props,
            }))
        }
        JsonNode::Array { expanded, items } => {
            let index = parse_index(step, full_path)?;
            let current = items.get(index).ok_or_else(|| not_found(full_path))?;
            let item = if rest.is_empty() {
                child
            } else {
                replace_at(current, full_path, rest, child)?
            };
            let mut items = items.clone();
            items[index] = item;
            Ok(Rc::new(JsonNode::Array {
                expanded: *expanded,
                items,
            }))
        }
        JsonNode::Value { .. } => Err(not_found(full_path)),
    }
}

/// Remove the node at `path`.
///
/// Array removal shifts subsequent elements left. Removing the root is
/// rejected with [`DataError::InvalidPatch`].
pub fn remove(node: &Rc<JsonNode>, path: &[String]) -> Result<Rc<JsonNode>, DataError> {
    remove_at(node, path, path)
}

fn remove_at(
    node: &Rc<JsonNode>,
    full_path: &[String],
    path: &[String],
) -> Result<Rc<JsonNode>, DataError> {
    let Some((step, rest)) = path.split_first() else {
        return Err(DataError::InvalidPatch(
            "cannot remove the root".to_string(),
        ));
    };
    match node.as_ref() {
        JsonNode::Object { expanded, props } => {
            let index = props
                .iter()
                .position(|prop| prop.name == *step)
                .ok_or_else(|| not_found(full_path))?;
            let mut props = props.clone();
            if rest.is_empty() {
                props.remove(index);
            } else {
                let value = remove_at(&props[index].value, full_path, rest)?;
                props[index] = Prop {
                    name: step.clone(),
                    value,
                };
            }
            Ok(Rc::new(JsonNode::Object {
                expanded: *expanded,
                props,
            }))
        }
        JsonNode::Array { expanded, items } => {
            let index = parse_index(step, full_path)?;
            if index >= items.len() {
                return Err(not_found(full_path));
            }
            let mut items = items.clone();
            if rest.is_empty() {
                items.remove(index);
            } else {
                let item = remove_at(&items[index], full_path, rest)?;
                items[index] = item;
            }
            Ok(Rc::new(JsonNode::Array {
                expanded: *expanded,
                items,
            }))
        }
        JsonNode::Value { .. } => Err(not_found(full_path)),
    }
}

fn parse_index(step: &str, full_path: &[String]) -> Result<usize, DataError> {
    if !is_valid_index(step) {
        return Err(not_found(full_path));
    }
    step.parse().map_err(|_| not_found(full_path))
}
