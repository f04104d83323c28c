//! Value tree -> minified JSON text.
//!
//! Strings, keys and numbers are written exactly as stored: the escaped form
//! is passed through, never re-escaped. Containers are walked with an explicit
//! stack so that deep trees built through the mutation API cannot overflow
//! the call stack.

use crate::arena::Arena;
use crate::error::Result;
use crate::value::{Data, ValueRef};

/// An open container on the serializer stack.
struct Frame {
    cursor: Option<usize>,
    object: bool,
    first: bool,
}

impl Arena {
    /// Serialize `v` to minified JSON, or `None` if the handle is stale.
    pub fn stringify(&self, v: ValueRef) -> Option<String> {
        let mut out = String::new();
        self.stringify_into(v, &mut out).ok()?;
        Some(out)
    }

    /// Append the minified JSON form of `v` to `out`.
    pub fn stringify_into(&self, v: ValueRef, out: &mut String) -> Result<()> {
        let root = self.resolve_mut(v)?;
        let mut stack = Vec::new();
        self.open(root, out, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let Some(index) = frame.cursor else {
                out.push(if frame.object { '}' } else { ']' });
                stack.pop();
                continue;
            };
            frame.cursor = self.next_sibling(index);
            if !frame.first {
                out.push(',');
            }
            frame.first = false;
            if frame.object {
                out.push('"');
                if let Some(span) = self.node(index).and_then(|n| n.key) {
                    out.push_str(self.text(span));
                }
                out.push_str("\":");
            }
            self.open(index, out, &mut stack);
        }
        Ok(())
    }

    /// Write a scalar, or the opening bracket of a container and push its
    /// frame.
    fn open(&self, index: usize, out: &mut String, stack: &mut Vec<Frame>) {
        let Some(node) = self.node(index) else {
            return;
        };
        match &node.data {
            Data::Null => out.push_str("null"),
            Data::Bool(true) => out.push_str("true"),
            Data::Bool(false) => out.push_str("false"),
            Data::Number(span) => out.push_str(self.text(*span)),
            Data::String(span) => {
                out.push('"');
                out.push_str(self.text(*span));
                out.push('"');
            }
            Data::Array(children) => {
                out.push('[');
                stack.push(Frame {
                    cursor: children.head,
                    object: false,
                    first: true,
                });
            }
            Data::Object(children) => {
                out.push('{');
                stack.push(Frame {
                    cursor: children.head,
                    object: true,
                    first: true,
                });
            }
        }
    }
}
