//! JSON codec for channel messages.
//!
//! Wire shapes:
//!
//! - patch: `{"targetNodePath": [..], "prop": "<member>", "args": [..]}`
//! - snapshot: `{"newHtml": "<markup>"}`
//! - argument: string | null | `{"nodePath": [..]}` | `["Text", s]` |
//!   `["Comment", s]` | `[tag, {attrs}, [children]]`
//!
//! Numbers and booleans are accepted as arguments and read back as strings.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::patch::{Message, Patch, SerializedArg, SerializedNode};

const TEXT_MARKER: &str = "Text";
const COMMENT_MARKER: &str = "Comment";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("INVALID_MESSAGE: {0}")]
    InvalidMessage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(reason: impl Into<String>) -> CodecError {
    CodecError::InvalidMessage(reason.into())
}

// ── Paths ─────────────────────────────────────────────────────────────────

fn encode_path(path: &[usize]) -> Value {
    Value::Array(path.iter().map(|step| json!(step)).collect())
}

fn decode_path(v: &Value) -> Result<Vec<usize>, CodecError> {
    v.as_array()
        .ok_or_else(|| invalid("node path must be an array"))?
        .iter()
        .map(|step| {
            step.as_u64()
                .map(|s| s as usize)
                .ok_or_else(|| invalid("node path steps must be non-negative integers"))
        })
        .collect()
}

// ── Serialization ─────────────────────────────────────────────────────────

pub fn node_to_json(node: &SerializedNode) -> Value {
    match node {
        SerializedNode::Text(data) => json!([TEXT_MARKER, data]),
        SerializedNode::Comment(data) => json!([COMMENT_MARKER, data]),
        SerializedNode::Element {
            tag,
            attrs,
            children,
        } => {
            let attrs: Map<String, Value> = attrs
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            json!([
                tag,
                Value::Object(attrs),
                children.iter().map(node_to_json).collect::<Vec<_>>()
            ])
        }
    }
}

pub fn arg_to_json(arg: &SerializedArg) -> Value {
    match arg {
        SerializedArg::Primitive(Some(value)) => Value::String(value.clone()),
        SerializedArg::Primitive(None) => Value::Null,
        SerializedArg::NodeReference(path) => json!({ "nodePath": encode_path(path) }),
        SerializedArg::InlineNode(node) => node_to_json(node),
    }
}

pub fn patch_to_json(patch: &Patch) -> Value {
    json!({
        "targetNodePath": encode_path(&patch.target_path),
        "prop": patch.member,
        "args": patch.args.iter().map(arg_to_json).collect::<Vec<_>>()
    })
}

pub fn to_json(message: &Message) -> Value {
    match message {
        Message::Patch(patch) => patch_to_json(patch),
        Message::Snapshot { new_html } => json!({ "newHtml": new_html }),
    }
}

/// One message as a single JSON line, without the trailing newline.
pub fn to_line(message: &Message) -> String {
    to_json(message).to_string()
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn node_from_json(v: &Value) -> Result<SerializedNode, CodecError> {
    let items = v
        .as_array()
        .ok_or_else(|| invalid("serialized node must be an array"))?;
    match items.as_slice() {
        [Value::String(marker), data] if marker == TEXT_MARKER => {
            let data = match data {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                _ => return Err(invalid("text content must be a string or null")),
            };
            Ok(SerializedNode::Text(data))
        }
        [Value::String(marker), Value::String(data)] if marker == COMMENT_MARKER => {
            Ok(SerializedNode::Comment(data.clone()))
        }
        [Value::String(tag), Value::Object(attrs), Value::Array(children)] => {
            let attrs = attrs
                .iter()
                .map(|(k, v)| {
                    v.as_str()
                        .map(|s| (k.clone(), s.to_owned()))
                        .ok_or_else(|| invalid(format!("attribute {k:?} must be a string")))
                })
                .collect::<Result<IndexMap<_, _>, _>>()?;
            let children = children
                .iter()
                .map(node_from_json)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SerializedNode::Element {
                tag: tag.clone(),
                attrs,
                children,
            })
        }
        _ => Err(invalid(format!("unrecognized serialized node: {v}"))),
    }
}

pub fn arg_from_json(v: &Value) -> Result<SerializedArg, CodecError> {
    match v {
        Value::Null => Ok(SerializedArg::Primitive(None)),
        Value::String(s) => Ok(SerializedArg::Primitive(Some(s.clone()))),
        Value::Number(n) => Ok(SerializedArg::Primitive(Some(n.to_string()))),
        Value::Bool(b) => Ok(SerializedArg::Primitive(Some(b.to_string()))),
        Value::Object(obj) => {
            let path = obj
                .get("nodePath")
                .ok_or_else(|| invalid("object argument requires 'nodePath'"))?;
            Ok(SerializedArg::NodeReference(decode_path(path)?))
        }
        Value::Array(_) => Ok(SerializedArg::InlineNode(node_from_json(v)?)),
    }
}

pub fn from_json(v: &Value) -> Result<Message, CodecError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("message must be an object"))?;
    if let Some(html) = obj.get("newHtml") {
        let new_html = html
            .as_str()
            .ok_or_else(|| invalid("'newHtml' must be a string"))?
            .to_owned();
        return Ok(Message::Snapshot { new_html });
    }
    let target_path = decode_path(
        obj.get("targetNodePath")
            .ok_or_else(|| invalid("patch requires 'targetNodePath'"))?,
    )?;
    let member = obj
        .get("prop")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("patch requires a string 'prop'"))?
        .to_owned();
    let args = obj
        .get("args")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("patch requires an 'args' array"))?
        .iter()
        .map(arg_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Message::Patch(Patch {
        target_path,
        member,
        args,
    }))
}

pub fn from_line(line: &str) -> Result<Message, CodecError> {
    let value: Value = serde_json::from_str(line)?;
    from_json(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_patch_wire_shape() {
        let patch = Patch {
            target_path: vec![0, 1, 0],
            member: "appendChild".into(),
            args: vec![SerializedArg::InlineNode(
                SerializedNode::element("button").with_child(SerializedNode::text("y")),
            )],
        };
        assert_eq!(
            patch_to_json(&patch),
            json!({
                "targetNodePath": [0, 1, 0],
                "prop": "appendChild",
                "args": [["button", {}, [["Text", "y"]]]]
            })
        );
    }

    #[test]
    fn null_stays_distinct_from_string_null() {
        let args = json!([null, "null", {"nodePath": []}]);
        let decoded: Vec<_> = args
            .as_array()
            .unwrap()
            .iter()
            .map(|v| arg_from_json(v).unwrap())
            .collect();
        assert_eq!(
            decoded,
            vec![
                SerializedArg::Primitive(None),
                SerializedArg::Primitive(Some("null".into())),
                SerializedArg::NodeReference(vec![]),
            ]
        );
    }

    #[test]
    fn numbers_and_booleans_become_strings() {
        assert_eq!(
            arg_from_json(&json!(2)).unwrap(),
            SerializedArg::Primitive(Some("2".into()))
        );
        assert_eq!(
            arg_from_json(&json!(true)).unwrap(),
            SerializedArg::Primitive(Some("true".into()))
        );
    }

    #[test]
    fn text_marker_is_case_sensitive() {
        // A lowercase "text" is an SVG element tag, not a text node.
        let svg_text = json!(["text", {"x": "1"}, [["Text", null]]]);
        let node = node_from_json(&svg_text).unwrap();
        assert_eq!(
            node,
            SerializedNode::element("text")
                .with_attr("x", "1")
                .with_child(SerializedNode::text(""))
        );
    }

    #[test]
    fn attribute_order_is_irrelevant_for_equality() {
        let a = node_from_json(&json!(["p", {"a": "1", "b": "2"}, []])).unwrap();
        let b = node_from_json(&json!(["p", {"b": "2", "a": "1"}, []])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn snapshot_line_round_trip() {
        let message = Message::Snapshot {
            new_html: "<html><head></head><body>\"q\"</body></html>".into(),
        };
        assert_eq!(from_line(&to_line(&message)).unwrap(), message);
    }

    #[test]
    fn malformed_messages_are_rejected() {
        for bad in [
            json!([]),
            json!({"prop": "appendChild", "args": []}),
            json!({"targetNodePath": [-1], "prop": "x", "args": []}),
            json!({"targetNodePath": [], "prop": 3, "args": []}),
            json!({"targetNodePath": [], "prop": "x", "args": [{"path": []}]}),
            json!({"targetNodePath": [], "prop": "x", "args": [["p", {}]]}),
        ] {
            assert!(
                matches!(from_json(&bad), Err(CodecError::InvalidMessage(_))),
                "accepted {bad}"
            );
        }
        assert!(matches!(from_line("{nope"), Err(CodecError::Json(_))));
    }
}
