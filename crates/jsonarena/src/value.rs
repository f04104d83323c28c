//! Node layout stored in arena slots.
//!
//! A node holds exactly one active payload ([`Data`]). Containers do not own a
//! `Vec` of children; instead each child stores the slot indices of its
//! neighbours, and the container keeps the head, tail and length of that
//! chain. Appending and detaching are O(1) and iteration never materialises a
//! collection.
//!
//! String, number and key bytes live in the arena's shared text buffer and are
//! referenced by [`Span`]. The buffer is append-only, so a span stays valid for
//! the lifetime of the arena even after the node that created it is
//! overwritten.

use crate::types::JsonType;
use std::sync::OnceLock;

/// Handle to a value stored in an [`Arena`](crate::Arena).
///
/// Handles are cheap to copy and never borrow the arena. Every operation
/// checks the handle's arena id and slot generation, so a handle that outlives
/// its slot (after a move, delete or container overwrite) is reported as stale
/// instead of aliasing unrelated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRef {
    pub(crate) arena: u32,
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Byte range into the arena text buffer. Always lies on UTF-8 boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Head of an intrusive sibling chain.
///
/// `id` names the container independently of the slot it currently lives in:
/// a move relocates the payload to another slot and only the arena's
/// container table needs updating, not every child.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildList {
    pub(crate) id: usize,
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) len: usize,
}

#[derive(Debug)]
pub(crate) enum Data {
    Null,
    Bool(bool),
    /// Number text exactly as written.
    Number(Span),
    /// String bytes in escaped form, without the surrounding quotes.
    String(Span),
    Array(ChildList),
    Object(ChildList),
}

impl Data {
    pub(crate) fn json_type(&self) -> JsonType {
        match self {
            Data::Null => JsonType::Null,
            Data::Bool(_) => JsonType::Bool,
            Data::Number(_) => JsonType::Number,
            Data::String(_) => JsonType::String,
            Data::Array(_) => JsonType::Array,
            Data::Object(_) => JsonType::Object,
        }
    }

    pub(crate) fn children(&self) -> Option<ChildList> {
        match self {
            Data::Array(children) | Data::Object(children) => Some(*children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut ChildList> {
        match self {
            Data::Array(children) | Data::Object(children) => Some(children),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    /// Escaped member key; `None` for array elements and roots.
    pub(crate) key: Option<Span>,
    /// Slot index of the next sibling inside the enclosing container.
    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
    /// Container id of the enclosing container.
    pub(crate) owner: Option<usize>,
    pub(crate) data: Data,
    pub(crate) unescaped: OnceLock<Box<str>>,
    pub(crate) unescaped_key: OnceLock<Box<str>>,
}

impl Node {
    pub(crate) fn new(data: Data) -> Self {
        Self {
            key: None,
            next: None,
            prev: None,
            owner: None,
            data,
            unescaped: OnceLock::new(),
            unescaped_key: OnceLock::new(),
        }
    }

    /// Swap in a new payload and drop any cached unescaped string.
    pub(crate) fn replace_data(&mut self, data: Data) -> Data {
        self.unescaped = OnceLock::new();
        std::mem::replace(&mut self.data, data)
    }

    pub(crate) fn replace_key(&mut self, key: Option<Span>) {
        self.unescaped_key = OnceLock::new();
        self.key = key;
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    /// `None` once the slot has been vacated.
    pub(crate) node: Option<Node>,
}
