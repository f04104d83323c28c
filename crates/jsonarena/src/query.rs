//! Read-only access: type tests, typed getters, lookup and traversal.
//!
//! Every getter returns `None` when the handle is stale or when the value's
//! active type does not match the accessor.

use crate::arena::Arena;
use crate::escape::unescape;
use crate::types::JsonType;
use crate::value::{Data, Node, Span, ValueRef};
use std::sync::OnceLock;

impl Arena {
    pub fn json_type(&self, v: ValueRef) -> Option<JsonType> {
        Some(self.get(v)?.data.json_type())
    }

    pub fn is_null(&self, v: ValueRef) -> bool {
        matches!(self.get(v).map(|n| &n.data), Some(Data::Null))
    }

    /// Number of children of an array or object; zero for anything else.
    pub fn size(&self, v: ValueRef) -> usize {
        self.get(v)
            .and_then(|n| n.data.children())
            .map_or(0, |c| c.len)
    }

    /// The member key in escaped form.
    ///
    /// Only object members report a key. A key set on a root or an array
    /// element is kept but stays hidden until the value is added to an object.
    pub fn get_key(&self, v: ValueRef) -> Option<&str> {
        let span = self.member_key(self.get(v)?)?;
        Some(self.text(span))
    }

    /// The member key with escape sequences decoded.
    pub fn get_unescaped_key(&self, v: ValueRef) -> Option<&str> {
        let node = self.get(v)?;
        let span = self.member_key(node)?;
        Some(decoded(&node.unescaped_key, self.text(span)))
    }

    /// The string payload in escaped form, exactly as stored.
    pub fn get_str(&self, v: ValueRef) -> Option<&str> {
        match self.get(v)?.data {
            Data::String(span) => Some(self.text(span)),
            _ => None,
        }
    }

    /// The string payload with escape sequences decoded. The decoded form is
    /// computed on first request and cached until the value is mutated.
    pub fn get_unescaped_str(&self, v: ValueRef) -> Option<&str> {
        let node = self.get(v)?;
        let Data::String(span) = node.data else {
            return None;
        };
        Some(decoded(&node.unescaped, self.text(span)))
    }

    /// The number payload as its original decimal text.
    pub fn get_num(&self, v: ValueRef) -> Option<&str> {
        match self.get(v)?.data {
            Data::Number(span) => Some(self.text(span)),
            _ => None,
        }
    }

    /// The number payload as `i64`, if it is an integer in range.
    pub fn get_i64(&self, v: ValueRef) -> Option<i64> {
        self.get_num(v)?.parse().ok()
    }

    /// The number payload as `u64`, if it is a non-negative integer in range.
    pub fn get_u64(&self, v: ValueRef) -> Option<u64> {
        self.get_num(v)?.parse().ok()
    }

    /// The number payload as the nearest `f64`.
    pub fn get_f64(&self, v: ValueRef) -> Option<f64> {
        self.get_num(v)?.parse().ok()
    }

    pub fn get_bool(&self, v: ValueRef) -> Option<bool> {
        match self.get(v)?.data {
            Data::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// First object member whose escaped key equals `key`.
    ///
    /// Keys are compared byte-for-byte in escaped form; no unescaping is done.
    pub fn obj_get(&self, v: ValueRef, key: &str) -> Option<ValueRef> {
        let Data::Object(children) = self.get(v)?.data else {
            return None;
        };
        self.chain(children.head)
            .find(|&index| {
                self.node(index)
                    .and_then(|n| n.key)
                    .is_some_and(|span| self.text(span) == key)
            })
            .map(|index| self.handle(index))
    }

    /// Array element at `index`, or `None` past the end.
    pub fn array_get(&self, v: ValueRef, index: usize) -> Option<ValueRef> {
        let Data::Array(children) = self.get(v)?.data else {
            return None;
        };
        if index >= children.len {
            return None;
        }
        self.chain(children.head)
            .nth(index)
            .map(|slot| self.handle(slot))
    }

    /// First child of an array or object.
    pub fn begin(&self, v: ValueRef) -> Option<ValueRef> {
        let head = self.get(v)?.data.children()?.head?;
        Some(self.handle(head))
    }

    /// Next sibling of a container member, or `None` at the end.
    pub fn next(&self, v: ValueRef) -> Option<ValueRef> {
        let next = self.get(v)?.next?;
        Some(self.handle(next))
    }

    /// Forward iterator over the children of `v`, driven by
    /// [`begin`](Self::begin) and [`next`](Self::next). Empty for scalars and
    /// stale handles.
    pub fn children(&self, v: ValueRef) -> Children<'_> {
        Children {
            arena: self,
            cursor: self.begin(v),
        }
    }

    /// Object members as `(escaped key, value)` pairs in insertion order.
    pub fn members(&self, v: ValueRef) -> impl Iterator<Item = (&str, ValueRef)> + '_ {
        let is_object = self.json_type(v) == Some(JsonType::Object);
        self.children(v)
            .filter(move |_| is_object)
            .filter_map(move |child| Some((self.get_key(child)?, child)))
    }

    fn member_key(&self, node: &Node) -> Option<Span> {
        let parent = self.owner_slot(node)?;
        match self.node(parent)?.data {
            Data::Object(_) => node.key,
            _ => None,
        }
    }

    /// Slot indices along a sibling chain.
    pub(crate) fn chain(&self, head: Option<usize>) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(head, move |&index| self.next_sibling(index))
    }
}

/// Unescaped form of `raw`, cached in `cache` when decoding allocates.
fn decoded<'a>(cache: &'a OnceLock<Box<str>>, raw: &'a str) -> &'a str {
    if !raw.contains('\\') {
        return raw;
    }
    cache.get_or_init(|| unescape(raw).into_owned().into_boxed_str())
}

/// Iterator over a container's children. See [`Arena::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    arena: &'a Arena,
    cursor: Option<ValueRef>,
}

impl Iterator for Children<'_> {
    type Item = ValueRef;

    fn next(&mut self) -> Option<ValueRef> {
        let current = self.cursor?;
        self.cursor = self.arena.next(current);
        Some(current)
    }
}
