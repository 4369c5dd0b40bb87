//! JSON codec for patch operations.
//!
//! Translates between [`Op`] and the RFC 6902 wire form,
//! `{"op": ..., "path": ..., "from"?: ..., "value"?: ...}` with paths as
//! JSON Pointer strings.

use serde_json::{json, Value};

use json_data_pointer::{compile_json_pointer, parse_json_pointer};

use crate::types::{DataError, Op, Path};

fn encode_path(path: &[String]) -> Value {
    Value::String(compile_json_pointer(path))
}

fn decode_path(v: &Value) -> Result<Path, DataError> {
    let s = v
        .as_str()
        .ok_or_else(|| DataError::InvalidPatch("path must be a string".to_string()))?;
    Ok(parse_json_pointer(s)?)
}

fn require<'a>(
    obj: &'a serde_json::Map<String, Value>,
    op: &str,
    field: &str,
) -> Result<&'a Value, DataError> {
    obj.get(field)
        .ok_or_else(|| DataError::InvalidPatch(format!("{op} requires '{field}'")))
}

/// Serialize an [`Op`] to its wire form.
pub fn op_to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": encode_path(path)
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": value
        }),
        Op::Copy { path, from } => json!({
            "op": "copy",
            "from": encode_path(from),
            "path": encode_path(path)
        }),
        Op::Move { path, from } => json!({
            "op": "move",
            "from": encode_path(from),
            "path": encode_path(path)
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": encode_path(path),
            "value": value
        }),
    }
}

/// Deserialize one operation object into an [`Op`].
///
/// Missing required fields and unknown operation names are
/// [`DataError::InvalidPatch`]; malformed pointer strings propagate as
/// [`DataError::Pointer`].
pub fn op_from_json(v: &Value) -> Result<Op, DataError> {
    let obj = v
        .as_object()
        .ok_or_else(|| DataError::InvalidPatch("operation must be an object".to_string()))?;
    let op_name = obj
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataError::InvalidPatch("missing 'op' field".to_string()))?;
    let path = decode_path(require(obj, op_name, "path")?)?;

    match op_name {
        "add" => {
            let value = require(obj, "add", "value")?.clone();
            Ok(Op::Add { path, value })
        }
        "remove" => Ok(Op::Remove { path }),
        "replace" => {
            let value = require(obj, "replace", "value")?.clone();
            Ok(Op::Replace { path, value })
        }
        "copy" => {
            let from = decode_path(require(obj, "copy", "from")?)?;
            Ok(Op::Copy { path, from })
        }
        "move" => {
            let from = decode_path(require(obj, "move", "from")?)?;
            Ok(Op::Move { path, from })
        }
        "test" => {
            let value = require(obj, "test", "value")?.clone();
            Ok(Op::Test { path, value })
        }
        other => Err(DataError::InvalidPatch(format!("unknown op: {other}"))),
    }
}

/// Serialize a list of operations to a JSON array.
pub fn patch_to_json(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(op_to_json).collect())
}

/// Deserialize a JSON array into a list of operations.
pub fn patch_from_json(v: &Value) -> Result<Vec<Op>, DataError> {
    let arr = v
        .as_array()
        .ok_or_else(|| DataError::InvalidPatch("patch must be an array".to_string()))?;
    arr.iter().map(op_from_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointerError;
    use serde_json::json;

    #[test]
    fn decode_rfc6902_patch() {
        let patch = json!([
            {"op": "add", "path": "/foo", "value": 1},
            {"op": "remove", "path": "/bar"},
            {"op": "replace", "path": "/baz", "value": "new"},
            {"op": "copy", "from": "/foo", "path": "/qux"},
            {"op": "move", "from": "/baz", "path": "/quux"},
            {"op": "test", "path": "/foo", "value": 1},
        ]);
        let ops = patch_from_json(&patch).unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[0].op_name(), "add");
        assert_eq!(ops[3].op_name(), "copy");
        assert_eq!(
            ops[4],
            Op::Move {
                path: vec!["quux".to_string()],
                from: vec!["baz".to_string()],
            }
        );
    }

    #[test]
    fn roundtrip_preserves_ops() {
        let ops = vec![
            Op::Add {
                path: vec!["a".to_string()],
                value: json!({"x": 1}),
            },
            Op::Move {
                path: vec!["b".to_string()],
                from: vec!["a".to_string()],
            },
            Op::Test {
                path: vec![],
                value: json!({"b": {"x": 1}}),
            },
        ];
        let decoded = patch_from_json(&patch_to_json(&ops)).unwrap();
        assert_eq!(decoded, ops);
    }

    #[test]
    fn escaped_pointers_survive_the_codec() {
        let op = op_from_json(&json!({"op": "remove", "path": "/foo/~1~0 ~0~1"})).unwrap();
        assert_eq!(
            op,
            Op::Remove {
                path: vec!["foo".to_string(), "/~ ~/".to_string()]
            }
        );
        assert_eq!(op_to_json(&op)["path"], json!("/foo/~1~0 ~0~1"));
    }

    #[test]
    fn missing_required_fields_are_invalid() {
        let err = op_from_json(&json!({"op": "add", "path": "/x"})).unwrap_err();
        assert_eq!(
            err,
            DataError::InvalidPatch("add requires 'value'".to_string())
        );

        let err = op_from_json(&json!({"op": "move", "path": "/x"})).unwrap_err();
        assert_eq!(
            err,
            DataError::InvalidPatch("move requires 'from'".to_string())
        );

        let err = op_from_json(&json!({"path": "/x"})).unwrap_err();
        assert_eq!(err, DataError::InvalidPatch("missing 'op' field".to_string()));

        let err = op_from_json(&json!({"op": "frobnicate", "path": "/x"})).unwrap_err();
        assert_eq!(
            err,
            DataError::InvalidPatch("unknown op: frobnicate".to_string())
        );
    }

    #[test]
    fn malformed_pointer_is_a_pointer_error() {
        let err = op_from_json(&json!({"op": "remove", "path": "no-slash"})).unwrap_err();
        assert_eq!(
            err,
            DataError::Pointer(PointerError::Syntax("no-slash".to_string()))
        );
    }
}
