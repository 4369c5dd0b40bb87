//! Conversion between raw JSON values and the annotated tree, plus
//! path-existence queries and expansion-state updates.

use std::rc::Rc;

use serde_json::Value;

use json_data_pointer::is_valid_index;

use crate::types::{JsonNode, Prop};

/// Convert a JSON value into an annotated tree.
///
/// `path` is the location of `json` within the enclosing document (the empty
/// path for a whole document). `expanded` is consulted once per container
/// node, with that container's path, to seed its `expanded` flag.
///
/// Key order of objects is preserved.
pub fn json_to_data(
    path: &[String],
    json: &Value,
    expanded: &dyn Fn(&[String]) -> bool,
) -> Rc<JsonNode> {
    match json {
        Value::Array(values) => {
            let mut child_path = path.to_vec();
            let items = values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    child_path.push(index.to_string());
                    let item = json_to_data(&child_path, value, expanded);
                    child_path.pop();
                    item
                })
                .collect();
            Rc::new(JsonNode::Array {
                expanded: expanded(path),
                items,
            })
        }
        Value::Object(map) => {
            let mut child_path = path.to_vec();
            let props = map
                .iter()
                .map(|(name, value)| {
                    child_path.push(name.clone());
                    let value = json_to_data(&child_path, value, expanded);
                    child_path.pop();
                    Prop {
                        name: name.clone(),
                        value,
                    }
                })
                .collect();
            Rc::new(JsonNode::Object {
                expanded: expanded(path),
                props,
            })
        }
        scalar => Rc::new(JsonNode::Value {
            value: scalar.clone(),
        }),
    }
}

/// Convert an annotated tree back into a JSON value.
///
/// The inverse of [`json_to_data`] up to the `expanded` flags, which are
/// presentation-only and dropped here. Child order is preserved.
pub fn data_to_json(node: &JsonNode) -> Value {
    match node {
        JsonNode::Value { value } => value.clone(),
        JsonNode::Array { items, .. } => {
            Value::Array(items.iter().map(|item| data_to_json(item)).collect())
        }
        JsonNode::Object { props, .. } => {
            let mut map = serde_json::Map::new();
            for prop in props {
                map.insert(prop.name.clone(), data_to_json(&prop.value));
            }
            Value::Object(map)
        }
    }
}

/// Check whether `path` resolves to a node in the tree.
///
/// The empty path exists against any node. Array segments must be valid
/// in-range indices; reaching a value node before the path is exhausted
/// means the path does not exist.
pub fn path_exists(node: &JsonNode, path: &[String]) -> bool {
    let Some((step, rest)) = path.split_first() else {
        return true;
    };
    match node {
        JsonNode::Object { props, .. } => props
            .iter()
            .find(|prop| prop.name == *step)
            .is_some_and(|prop| path_exists(&prop.value, rest)),
        JsonNode::Array { items, .. } => {
            if !is_valid_index(step) {
                return false;
            }
            step.parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .is_some_and(|item| path_exists(item, rest))
        }
        JsonNode::Value { .. } => false,
    }
}

/// Set the `expanded` flag of the container node at exactly `path`.
///
/// Ancestors and descendants are untouched. Value nodes and paths that do
/// not resolve are no-ops. When no flag actually changes, the input tree is
/// returned as-is (same allocation, observable with [`Rc::ptr_eq`]).
pub fn expand_path(node: &Rc<JsonNode>, path: &[String], expanded: bool) -> Rc<JsonNode> {
    try_expand_path(node, path, expanded).unwrap_or_else(|| Rc::clone(node))
}

/// Set the `expanded` flag of every container node whose path satisfies
/// `predicate`. This is a full tree walk.
///
/// Identity-preserving like [`expand_path`]: if no flag changes, the input
/// tree is returned unchanged.
pub fn expand_where<F>(node: &Rc<JsonNode>, predicate: F, expanded: bool) -> Rc<JsonNode>
where
    F: Fn(&[String]) -> bool,
{
    let mut path = Vec::new();
    try_expand_where(node, &predicate, expanded, &mut path).unwrap_or_else(|| Rc::clone(node))
}

// Returns None when nothing changed, so unchanged subtrees keep their
// original allocation.
fn try_expand_path(node: &Rc<JsonNode>, path: &[String], expanded: bool) -> Option<Rc<JsonNode>> {
    let Some((step, rest)) = path.split_first() else {
        return set_expanded(node, expanded);
    };
    match node.as_ref() {
        JsonNode::Object {
            expanded: flag,
            props,
        } => {
            let index = props.iter().position(|prop| prop.name == *step)?;
            let value = try_expand_path(&props[index].value, rest, expanded)?;
            let mut props = props.clone();
            props[index] = Prop {
                name: props[index].name.clone(),
                value,
            };
            Some(Rc::new(JsonNode::Object {
                expanded: *flag,
                props,
            }))
        }
        JsonNode::Array {
            expanded: flag,
            items,
        } => {
            if !is_valid_index(step) {
                return None;
            }
            let index: usize = step.parse().ok()?;
            let item = try_expand_path(items.get(index)?, rest, expanded)?;
            let mut items = items.clone();
            items[index] = item;
            Some(Rc::new(JsonNode::Array {
                expanded: *flag,
                items,
            }))
        }
        JsonNode::Value { .. } => None,
    }
}

fn try_expand_where(
    node: &Rc<JsonNode>,
    predicate: &dyn Fn(&[String]) -> bool,
    expanded: bool,
    path: &mut Vec<String>,
) -> Option<Rc<JsonNode>> {
    match node.as_ref() {
        JsonNode::Value { .. } => None,
        JsonNode::Object {
            expanded: flag,
            props,
        } => {
            let new_flag = if predicate(path) { expanded } else { *flag };
            let mut changed = new_flag != *flag;
            let mut new_props = Vec::with_capacity(props.len());
            for prop in props {
                path.push(prop.name.clone());
                let updated = try_expand_where(&prop.value, predicate, expanded, path);
                path.pop();
                match updated {
                    Some(value) => {
                        changed = true;
                        new_props.push(Prop {
                            name: prop.name.clone(),
                            value,
                        });
                    }
                    None => new_props.push(prop.clone()),
                }
            }
            if changed {
                Some(Rc::new(JsonNode::Object {
                    expanded: new_flag,
                    props: new_props,
                }))
            } else {
                None
            }
        }
        JsonNode::Array {
            expanded: flag,
            items,
        } => {
            let new_flag = if predicate(path) { expanded } else { *flag };
            let mut changed = new_flag != *flag;
            let mut new_items = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index.to_string());
                let updated = try_expand_where(item, predicate, expanded, path);
                path.pop();
                match updated {
                    Some(item) => {
                        changed = true;
                        new_items.push(item);
                    }
                    None => new_items.push(Rc::clone(item)),
                }
            }
            if changed {
                Some(Rc::new(JsonNode::Array {
                    expanded: new_flag,
                    items: new_items,
                }))
            } else {
                None
            }
        }
    }
}

fn set_expanded(node: &Rc<JsonNode>, expanded: bool) -> Option<Rc<JsonNode>> {
    match node.as_ref() {
        JsonNode::Object {
            expanded: flag,
            props,
        } if *flag != expanded => Some(Rc::new(JsonNode::Object {
            expanded,
            props: props.clone(),
        })),
        JsonNode::Array {
            expanded: flag,
            items,
        } if *flag != expanded => Some(Rc::new(JsonNode::Array {
            expanded,
            items: items.clone(),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    fn example() -> Value {
        json!({
            "obj": {"arr": [1, 2, {"a": 3, "b": 4}]},
            "str": "hello world",
            "nill": null,
            "bool": false
        })
    }

    #[test]
    fn json_to_data_classifies_nodes() {
        let data = json_to_data(&[], &example(), &|_| true);
        let JsonNode::Object { expanded, props } = data.as_ref() else {
            panic!("expected object node");
        };
        assert!(*expanded);
        assert_eq!(props.len(), 4);
        assert_eq!(props[0].name, "obj");
        assert!(matches!(
            props[1].value.as_ref(),
            JsonNode::Value { value } if value == &json!("hello world")
        ));
        assert!(matches!(
            props[2].value.as_ref(),
            JsonNode::Value { value } if value.is_null()
        ));
    }

    #[test]
    fn expand_predicate_receives_container_paths() {
        let mut seen = std::cell::RefCell::new(Vec::new());
        json_to_data(&[], &example(), &|p: &[String]| {
            seen.borrow_mut().push(p.to_vec());
            false
        });
        let seen = seen.get_mut();
        assert!(seen.contains(&path(&[])));
        assert!(seen.contains(&path(&["obj"])));
        assert!(seen.contains(&path(&["obj", "arr"])));
        assert!(seen.contains(&path(&["obj", "arr", "2"])));
        // Scalars never reach the predicate
        assert!(!seen.contains(&path(&["str"])));
    }

    #[test]
    fn roundtrip_preserves_value_content() {
        let json = example();
        let data = json_to_data(&[], &json, &|_| false);
        assert_eq!(data_to_json(&data), json);
    }

    #[test]
    fn roundtrip_preserves_key_order() {
        let json = json!({"z": 1, "a": 2, "m": 3});
        let data = json_to_data(&[], &json, &|_| true);
        let keys: Vec<_> = data_to_json(&data)
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn path_exists_cases() {
        let data = json_to_data(&[], &example(), &|_| false);
        assert!(path_exists(&data, &path(&["obj", "arr", "2", "a"])));
        assert!(!path_exists(&data, &path(&["obj", "foo"])));
        assert!(!path_exists(&data, &path(&["obj", "foo", "bar"])));
        assert!(path_exists(&data, &[]));
        // Out of range and malformed array indices
        assert!(!path_exists(&data, &path(&["obj", "arr", "3"])));
        assert!(!path_exists(&data, &path(&["obj", "arr", "-"])));
        assert!(!path_exists(&data, &path(&["obj", "arr", "01"])));
        // Descending into a scalar
        assert!(!path_exists(&data, &path(&["str", "x"])));
    }

    #[test]
    fn expand_single_path() {
        let data = json_to_data(&[], &example(), &|_| true);
        let collapsed = expand_path(&data, &path(&["obj", "arr", "2"]), false);

        let target = |node: &Rc<JsonNode>| -> Option<bool> {
            let JsonNode::Object { props, .. } = node.as_ref() else {
                return None;
            };
            let JsonNode::Object { props, .. } = props[0].value.as_ref() else {
                return None;
            };
            let JsonNode::Array { items, .. } = props[0].value.as_ref() else {
                return None;
            };
            items[2].expanded()
        };
        assert_eq!(target(&collapsed), Some(false));
        // Ancestors keep their flags
        assert_eq!(collapsed.expanded(), Some(true));
        // Value content unchanged
        assert_eq!(data_to_json(&collapsed), data_to_json(&data));
    }

    #[test]
    fn expand_path_shares_untouched_siblings() {
        let data = json_to_data(&[], &example(), &|_| true);
        let collapsed = expand_path(&data, &path(&["obj", "arr", "2"]), false);

        let prop = |node: &Rc<JsonNode>, index: usize| -> Rc<JsonNode> {
            let JsonNode::Object { props, .. } = node.as_ref() else {
                panic!("expected object node");
            };
            Rc::clone(&props[index].value)
        };
        // The "str" sibling is the exact same allocation
        assert!(Rc::ptr_eq(&prop(&data, 1), &prop(&collapsed, 1)));
        // The "obj" spine was rebuilt
        assert!(!Rc::ptr_eq(&prop(&data, 0), &prop(&collapsed, 0)));
    }

    #[test]
    fn expand_with_predicate() {
        let data = json_to_data(&[], &example(), &|_| true);
        let collapsed = expand_where(&data, |p: &[String]| !p.is_empty(), false);

        // The root keeps its flag, every nested container is collapsed
        assert_eq!(collapsed.expanded(), Some(true));
        let JsonNode::Object { props, .. } = collapsed.as_ref() else {
            panic!("expected object node");
        };
        assert_eq!(props[0].value.expanded(), Some(false));
        assert_eq!(data_to_json(&collapsed), data_to_json(&data));
    }

    #[test]
    fn expand_noop_returns_identical_tree() {
        let data = json_to_data(&[], &example(), &|_| true);

        let unchanged = expand_where(&data, |_: &[String]| false, false);
        assert!(Rc::ptr_eq(&data, &unchanged));

        // Setting the flag to its current state is also a no-op
        let unchanged = expand_path(&data, &path(&["obj"]), true);
        assert!(Rc::ptr_eq(&data, &unchanged));

        // A path that resolves to a scalar is a no-op
        let unchanged = expand_path(&data, &path(&["str"]), false);
        assert!(Rc::ptr_eq(&data, &unchanged));

        // A missing path is a no-op
        let unchanged = expand_path(&data, &path(&["nope"]), false);
        assert!(Rc::ptr_eq(&data, &unchanged));
    }
}
