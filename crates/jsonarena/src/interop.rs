//! Conversion to and from `serde_json::Value`.
//!
//! Useful at the edges (pretty-printing, handing a subtree to serde-based
//! code, building a tree from typed data via `serde_json::to_value`). The
//! arena form stays authoritative: numbers keep their original text, while the
//! serde form holds whatever `serde_json::Number` can represent.
//!
//! Objects are converted in insertion order. `serde_json::Map` cannot hold
//! duplicate keys, so for repeated keys the last value wins at the position
//! of the first occurrence.

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::value::{Data, ValueRef};
use serde_json::{Map, Number, Value};

/// An open container on the conversion stack.
struct Frame {
    /// Key of this container inside its parent object.
    key: Option<String>,
    cursor: Option<usize>,
    body: Body,
}

enum Body {
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Body {
    fn push(&mut self, key: Option<String>, value: Value) {
        match self {
            Body::Array(items) => items.push(value),
            Body::Object(map) => {
                map.insert(key.unwrap_or_default(), value);
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Body::Array(items) => Value::Array(items),
            Body::Object(map) => Value::Object(map),
        }
    }
}

enum Entry {
    Scalar(Value),
    Container(Body, Option<usize>),
}

impl Arena {
    /// Convert the subtree at `v` into a `serde_json::Value`.
    ///
    /// Strings and keys are unescaped. Fails on a stale handle or on a
    /// number outside the range of `serde_json::Number` (e.g. `1e400`).
    /// Nesting depth is limited only by memory.
    pub fn to_serde_value(&self, v: ValueRef) -> Result<Value> {
        let root = self.resolve_mut(v)?;
        let mut stack = match self.entry(root)? {
            Entry::Scalar(value) => return Ok(value),
            Entry::Container(body, head) => vec![Frame {
                key: None,
                cursor: head,
                body,
            }],
        };

        let mut result = Value::Null;
        while let Some(frame) = stack.last_mut() {
            let Some(index) = frame.cursor else {
                if let Some(done) = stack.pop() {
                    let value = done.body.finish();
                    match stack.last_mut() {
                        Some(parent) => parent.body.push(done.key, value),
                        None => result = value,
                    }
                }
                continue;
            };
            frame.cursor = self.next_sibling(index);
            let key = match frame.body {
                Body::Object(_) => Some(
                    self.get_unescaped_key(self.handle(index))
                        .unwrap_or_default()
                        .to_string(),
                ),
                Body::Array(_) => None,
            };
            match self.entry(index)? {
                Entry::Scalar(value) => frame.body.push(key, value),
                Entry::Container(body, cursor) => stack.push(Frame { key, cursor, body }),
            }
        }
        Ok(result)
    }

    /// A finished scalar, or an empty container body plus its first child.
    fn entry(&self, index: usize) -> Result<Entry> {
        let Some(node) = self.node(index) else {
            return Err(Error::StaleHandle);
        };
        Ok(match &node.data {
            Data::Null => Entry::Scalar(Value::Null),
            Data::Bool(b) => Entry::Scalar(Value::Bool(*b)),
            Data::Number(span) => {
                let text = self.text(*span);
                let number: Number =
                    serde_json::from_str(text).map_err(|_| Error::Number(text.to_string()))?;
                Entry::Scalar(Value::Number(number))
            }
            Data::String(_) => Entry::Scalar(Value::String(
                self.get_unescaped_str(self.handle(index))
                    .unwrap_or_default()
                    .to_string(),
            )),
            Data::Array(children) => Entry::Container(Body::Array(Vec::new()), children.head),
            Data::Object(children) => Entry::Container(Body::Object(Map::new()), children.head),
        })
    }

    /// Overwrite `v` with the contents of `value`. `v` keeps its key and
    /// position; strings and keys are escaped on the way in.
    pub fn set_serde_value(&mut self, v: ValueRef, value: &Value) -> Result<()> {
        self.resolve_mut(v)?;
        let root = self.new_value();
        self.build(root, value)?;
        self.set_fast(v, root)
    }

    fn build(&mut self, target: ValueRef, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.set_null(target),
            Value::Bool(b) => self.set_bool(target, *b),
            Value::Number(n) => self.set_num_str(target, &n.to_string()),
            Value::String(s) => self.set_str_escape(target, s),
            Value::Array(items) => {
                self.set_array(target)?;
                for item in items {
                    let element = self.new_value();
                    self.build(element, item)?;
                    self.array_add_fast(target, element)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                self.set_obj(target)?;
                for (key, item) in map {
                    let member = self.new_value();
                    self.set_key_escape(member, key)?;
                    self.build(member, item)?;
                    self.obj_add_fast(target, member)?;
                }
                Ok(())
            }
        }
    }
}
