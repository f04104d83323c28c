//! The arena that owns every value and byte buffer of a document.
//!
//! An [`Arena`] hands out fixed-size node slots and appends string, key and
//! number bytes to one shared text buffer. Nothing is freed individually:
//! deleting or overwriting a value only vacates its slot (bumping the slot
//! generation so old handles go stale). Memory is returned when the arena is
//! released or dropped.

use crate::error::{Error, Result};
use crate::value::{ChildList, Data, Node, Slot, Span, ValueRef};
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Memory accounting for an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ArenaStats {
    /// Slots ever allocated, including vacated ones.
    pub nodes: usize,
    /// Slots still holding a value.
    pub live_nodes: usize,
    /// Bytes appended to the text buffer.
    pub text_bytes: usize,
}

/// Owner of all memory for one JSON document.
///
/// Values are addressed through [`ValueRef`] handles. The arena is `Send` and
/// `Sync`: any number of threads may read through `&Arena` at once, while
/// every mutation needs `&mut Arena` and therefore exclusive access.
#[derive(Debug)]
pub struct Arena {
    id: u32,
    pub(crate) slots: Vec<Slot>,
    text: String,
    /// Container id -> slot index currently holding that container's payload.
    containers: Vec<usize>,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create an arena with room for `nodes` values and `text_bytes` bytes of
    /// string data before the first reallocation.
    pub fn with_capacity(nodes: usize, text_bytes: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(nodes),
            text: String::with_capacity(text_bytes),
            containers: Vec::new(),
        }
    }

    /// Release every value at once. All handles from this arena become
    /// unusable; the consumed arena cannot be released twice.
    pub fn release(self) -> ArenaStats {
        let stats = self.stats();
        tracing::trace!(
            nodes = stats.nodes,
            live_nodes = stats.live_nodes,
            text_bytes = stats.text_bytes,
            "arena released"
        );
        stats
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            nodes: self.slots.len(),
            live_nodes: self.slots.iter().filter(|s| s.node.is_some()).count(),
            text_bytes: self.text.len(),
        }
    }

    /// Create a fresh root value of type null.
    pub fn new_value(&mut self) -> ValueRef {
        let index = self.alloc(Node::new(Data::Null));
        self.handle(index)
    }

    /// Whether `v` still refers to a live value of this arena.
    pub fn contains(&self, v: ValueRef) -> bool {
        self.resolve(v).is_some()
    }

    // --- slot plumbing -----------------------------------------------------

    pub(crate) fn handle(&self, index: usize) -> ValueRef {
        ValueRef {
            arena: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Slot index behind a handle, if the handle is live.
    pub(crate) fn resolve(&self, v: ValueRef) -> Option<usize> {
        if v.arena != self.id {
            return None;
        }
        let slot = self.slots.get(v.index)?;
        (slot.generation == v.generation && slot.node.is_some()).then_some(v.index)
    }

    pub(crate) fn resolve_mut(&self, v: ValueRef) -> Result<usize> {
        self.resolve(v).ok_or(Error::StaleHandle)
    }

    pub(crate) fn node(&self, index: usize) -> Option<&Node> {
        self.slots.get(index)?.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.slots.get_mut(index)?.node.as_mut()
    }

    pub(crate) fn get(&self, v: ValueRef) -> Option<&Node> {
        self.node(self.resolve(v)?)
    }

    pub(crate) fn alloc(&mut self, node: Node) -> usize {
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.slots.len() - 1
    }

    pub(crate) fn alloc_text(&mut self, s: &str) -> Span {
        let start = self.text.len();
        self.text.push_str(s);
        Span {
            start,
            end: self.text.len(),
        }
    }

    pub(crate) fn text(&self, span: Span) -> &str {
        &self.text[span.start..span.end]
    }

    /// Register a new, empty container that will live in slot `index`.
    pub(crate) fn new_children(&mut self, index: usize) -> ChildList {
        self.containers.push(index);
        ChildList {
            id: self.containers.len() - 1,
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn children_of(&self, index: usize) -> Option<ChildList> {
        self.node(index)?.data.children()
    }

    pub(crate) fn next_sibling(&self, index: usize) -> Option<usize> {
        self.node(index)?.next
    }

    /// Slot currently holding the container that `node` belongs to.
    pub(crate) fn owner_slot(&self, node: &Node) -> Option<usize> {
        node.owner.map(|id| self.containers[id])
    }

    /// Install `data` into slot `index`, discarding the previous payload and
    /// invalidating every handle into the discarded subtree.
    pub(crate) fn install(&mut self, index: usize, data: Data) {
        if let Some(children) = data.children() {
            self.containers[children.id] = index;
        }
        let old = match self.node_mut(index) {
            Some(node) => node.replace_data(data),
            None => return,
        };
        if let Some(children) = old.children() {
            self.discard_chain(children.head);
        }
    }

    /// Remove `index`'s payload for a move. The node is detached from its
    /// container and the slot vacated, so existing handles go stale.
    pub(crate) fn take_data(&mut self, index: usize) -> Data {
        self.detach(index);
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.node.take().map_or(Data::Null, |node| node.data)
    }

    /// Vacate slot `index` and its whole subtree.
    pub(crate) fn discard(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(node) = slot.node.take() {
            if let Some(children) = node.data.children() {
                self.discard_chain(children.head);
            }
        }
    }

    fn discard_chain(&mut self, head: Option<usize>) {
        let mut pending: Vec<usize> = head.into_iter().collect();
        while let Some(first) = pending.pop() {
            let mut cursor = Some(first);
            while let Some(index) = cursor {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                cursor = match slot.node.take() {
                    Some(node) => {
                        if let Some(head) = node.data.children().and_then(|c| c.head) {
                            pending.push(head);
                        }
                        node.next
                    }
                    None => None,
                };
            }
        }
    }

    /// Append slot `child` to the container in slot `parent`.
    pub(crate) fn link_child(&mut self, parent: usize, child: usize) {
        let Some(children) = self.node_mut(parent).and_then(|n| n.data.children_mut()) else {
            return;
        };
        let previous_tail = children.tail.replace(child);
        if children.head.is_none() {
            children.head = Some(child);
        }
        children.len += 1;
        let id = children.id;
        if let Some(tail) = previous_tail {
            if let Some(node) = self.node_mut(tail) {
                node.next = Some(child);
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.owner = Some(id);
            node.next = None;
            node.prev = previous_tail;
        }
    }

    /// Unlink `index` from its enclosing container, if any. The node keeps
    /// its payload and key.
    pub(crate) fn detach(&mut self, index: usize) {
        let Some(node) = self.node_mut(index) else {
            return;
        };
        let prev = node.prev.take();
        let next = node.next.take();
        let Some(owner) = node.owner.take() else {
            return;
        };
        let parent = self.containers[owner];
        if let Some(node) = prev.and_then(|p| self.node_mut(p)) {
            node.next = next;
        }
        if let Some(node) = next.and_then(|n| self.node_mut(n)) {
            node.prev = prev;
        }
        if let Some(children) = self.node_mut(parent).and_then(|n| n.data.children_mut()) {
            if children.head == Some(index) {
                children.head = next;
            }
            if children.tail == Some(index) {
                children.tail = prev;
            }
            children.len -= 1;
        }
    }

    /// Unlink `target` from its container and vacate its subtree.
    pub(crate) fn unlink(&mut self, target: usize) {
        self.detach(target);
        self.discard(target);
    }

    /// True when `ancestor` is `index` itself or encloses it.
    ///
    /// Climbs from `index` towards the root and walks down `ancestor`'s
    /// subtree one step at a time, stopping when either side runs out, so the
    /// cost is bounded by the smaller of the two.
    pub(crate) fn encloses(&self, ancestor: usize, index: usize) -> bool {
        if ancestor == index {
            return true;
        }
        let Some(head) = self.children_of(ancestor).and_then(|c| c.head) else {
            return false;
        };
        let mut upward = index;
        let mut downward = vec![head];
        loop {
            match self.node(upward).and_then(|n| self.owner_slot(n)) {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => upward = parent,
                None => return false,
            }
            let Some(current) = downward.pop() else {
                return false;
            };
            if current == index {
                return true;
            }
            if let Some(next) = self.next_sibling(current) {
                downward.push(next);
            }
            if let Some(head) = self.children_of(current).and_then(|c| c.head) {
                downward.push(head);
            }
        }
    }

    /// Deep-copy the subtree at `src` into fresh slots and return the new
    /// root. The copy keeps the source key but is not linked anywhere.
    pub(crate) fn copy_subtree(&mut self, src: usize) -> usize {
        let root = self.copy_node(src);
        let mut pending = vec![(src, root)];
        while let Some((from, to)) = pending.pop() {
            let mut cursor = self.children_of(from).and_then(|c| c.head);
            while let Some(child) = cursor {
                let copy = self.copy_node(child);
                self.link_child(to, copy);
                if self.children_of(child).is_some() {
                    pending.push((child, copy));
                }
                cursor = self.next_sibling(child);
            }
        }
        root
    }

    /// Copy a single node: key and scalar payload, or an empty container of
    /// the same kind.
    fn copy_node(&mut self, src: usize) -> usize {
        let index = self.alloc(Node::new(Data::Null));
        let Some(source) = self.node(src) else {
            return index;
        };
        let key = source.key;
        let mut data = match &source.data {
            Data::Null => Data::Null,
            Data::Bool(b) => Data::Bool(*b),
            Data::Number(span) => Data::Number(*span),
            Data::String(span) => Data::String(*span),
            Data::Array(children) => Data::Array(*children),
            Data::Object(children) => Data::Object(*children),
        };
        if let Some(children) = data.children_mut() {
            *children = self.new_children(index);
        }
        if let Some(node) = self.node_mut(index) {
            node.key = key;
            node.data = data;
        }
        index
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
