//! Setters and structural edits.
//!
//! Every operation validates all of its preconditions before touching the
//! tree, so a returned error means nothing changed.
//!
//! The `*_fast` variants and [`Arena::move_value`] transfer a payload in O(1)
//! instead of copying it. The source is detached from its container (which
//! shrinks by one) and its handle goes stale.
//!
//! Keys are stored on any value but only observable on object members:
//! `get_key` and `stringify` ignore the key of a root or array element until
//! the value is added to an object.

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::escape::{escape, is_valid_number};
use crate::value::{Data, Node, ValueRef};

impl Arena {
    pub fn set_null(&mut self, v: ValueRef) -> Result<()> {
        let index = self.resolve_mut(v)?;
        self.install(index, Data::Null);
        Ok(())
    }

    pub fn set_bool(&mut self, v: ValueRef, b: bool) -> Result<()> {
        let index = self.resolve_mut(v)?;
        self.install(index, Data::Bool(b));
        Ok(())
    }

    /// Store `num` as the number text. It must match the JSON number grammar.
    pub fn set_num_str(&mut self, v: ValueRef, num: &str) -> Result<()> {
        let index = self.resolve_mut(v)?;
        if !is_valid_number(num) {
            return Err(Error::InvalidNumber(num.to_string()));
        }
        let span = self.alloc_text(num);
        self.install(index, Data::Number(span));
        Ok(())
    }

    /// Store `s` verbatim as an already-escaped string.
    ///
    /// The text is not checked: raw control characters, quotes or dangling
    /// backslashes are written out unchanged by `stringify` and produce
    /// invalid JSON. Use [`set_str_escape`](Self::set_str_escape) for
    /// arbitrary text.
    pub fn set_str(&mut self, v: ValueRef, s: &str) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let span = self.alloc_text(s);
        self.install(index, Data::String(span));
        Ok(())
    }

    /// Escape `s` and store it as a string.
    pub fn set_str_escape(&mut self, v: ValueRef, s: &str) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let span = self.alloc_text(&escape(s));
        self.install(index, Data::String(span));
        Ok(())
    }

    /// Store `key` verbatim as an already-escaped member key.
    ///
    /// A key on a value outside any object is not visible until the value is
    /// added to one.
    pub fn set_key(&mut self, v: ValueRef, key: &str) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let span = self.alloc_text(key);
        if let Some(node) = self.node_mut(index) {
            node.replace_key(Some(span));
        }
        Ok(())
    }

    /// Escape `key` and store it as the member key.
    pub fn set_key_escape(&mut self, v: ValueRef, key: &str) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let span = self.alloc_text(&escape(key));
        if let Some(node) = self.node_mut(index) {
            node.replace_key(Some(span));
        }
        Ok(())
    }

    /// Reset `v` to an empty array.
    pub fn set_array(&mut self, v: ValueRef) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let children = self.new_children(index);
        self.install(index, Data::Array(children));
        Ok(())
    }

    /// Reset `v` to an empty object.
    pub fn set_obj(&mut self, v: ValueRef) -> Result<()> {
        let index = self.resolve_mut(v)?;
        let children = self.new_children(index);
        self.install(index, Data::Object(children));
        Ok(())
    }

    /// Overwrite `dst` with a deep copy of `src`. `dst` keeps its key and
    /// position; `src` is unaffected.
    pub fn set(&mut self, dst: ValueRef, src: ValueRef) -> Result<()> {
        let target = self.resolve_mut(dst)?;
        let source = self.resolve_mut(src)?;
        let copy = self.copy_subtree(source);
        let data = self.take_data(copy);
        self.install(target, data);
        Ok(())
    }

    /// Move the payload of `src` into `dst` without copying. `dst` keeps its
    /// key and position; `src` goes stale.
    pub fn set_fast(&mut self, dst: ValueRef, src: ValueRef) -> Result<()> {
        let target = self.resolve_mut(dst)?;
        let source = self.resolve_mut(src)?;
        if target == source {
            return Ok(());
        }
        if self.encloses(source, target) {
            return Err(Error::CyclicMove);
        }
        let data = self.take_data(source);
        self.install(target, data);
        Ok(())
    }

    /// Append a deep copy of `member` (which must carry a key) to `obj`.
    /// Duplicate keys are allowed. Returns the new member.
    pub fn obj_add(&mut self, obj: ValueRef, member: ValueRef) -> Result<ValueRef> {
        let (container, source) = self.check_obj_add(obj, member)?;
        let copy = self.copy_subtree(source);
        self.link_child(container, copy);
        Ok(self.handle(copy))
    }

    /// Move `member` (which must carry a key) into `obj` as its last member.
    /// `member` goes stale. Returns the new member.
    pub fn obj_add_fast(&mut self, obj: ValueRef, member: ValueRef) -> Result<ValueRef> {
        let (container, source) = self.check_obj_add(obj, member)?;
        if self.encloses(source, container) {
            return Err(Error::CyclicMove);
        }
        let moved = self.relocate(source);
        self.link_child(container, moved);
        Ok(self.handle(moved))
    }

    fn check_obj_add(&self, obj: ValueRef, member: ValueRef) -> Result<(usize, usize)> {
        let container = self.resolve_mut(obj)?;
        let source = self.resolve_mut(member)?;
        match self.node(container).map(|n| &n.data) {
            Some(Data::Object(_)) => {}
            _ => return Err(Error::NotAnObject),
        }
        if self.node(source).and_then(|n| n.key).is_none() {
            return Err(Error::MissingKey);
        }
        Ok((container, source))
    }

    /// Append a deep copy of `element` to `arr`. Any key on the copy is
    /// dropped. Returns the new element.
    pub fn array_add(&mut self, arr: ValueRef, element: ValueRef) -> Result<ValueRef> {
        let (container, source) = self.check_array_add(arr, element)?;
        let copy = self.copy_subtree(source);
        if let Some(node) = self.node_mut(copy) {
            node.replace_key(None);
        }
        self.link_child(container, copy);
        Ok(self.handle(copy))
    }

    /// Move `element` into `arr` as its last element. `element` goes stale.
    /// Returns the new element.
    pub fn array_add_fast(&mut self, arr: ValueRef, element: ValueRef) -> Result<ValueRef> {
        let (container, source) = self.check_array_add(arr, element)?;
        if self.encloses(source, container) {
            return Err(Error::CyclicMove);
        }
        let moved = self.relocate(source);
        if let Some(node) = self.node_mut(moved) {
            node.replace_key(None);
        }
        self.link_child(container, moved);
        Ok(self.handle(moved))
    }

    fn check_array_add(&self, arr: ValueRef, element: ValueRef) -> Result<(usize, usize)> {
        let container = self.resolve_mut(arr)?;
        let source = self.resolve_mut(element)?;
        match self.node(container).map(|n| &n.data) {
            Some(Data::Array(_)) => Ok((container, source)),
            _ => Err(Error::NotAnArray),
        }
    }

    /// Remove the first member of `obj` whose escaped key equals `key`.
    /// Handles into the removed member go stale.
    pub fn obj_del(&mut self, obj: ValueRef, key: &str) -> Result<()> {
        let container = self.resolve_mut(obj)?;
        let Some(Data::Object(children)) = self.node(container).map(|n| &n.data) else {
            return Err(Error::NotAnObject);
        };
        let found = self.chain(children.head).find(|&index| {
            self.node(index)
                .and_then(|n| n.key)
                .is_some_and(|span| self.text(span) == key)
        });
        match found {
            Some(index) => {
                self.unlink(index);
                Ok(())
            }
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Remove the element at `index`, shifting later elements down.
    /// Handles into the removed element go stale.
    pub fn array_del(&mut self, arr: ValueRef, index: usize) -> Result<()> {
        let container = self.resolve_mut(arr)?;
        let Some(Data::Array(children)) = self.node(container).map(|n| &n.data) else {
            return Err(Error::NotAnArray);
        };
        if index >= children.len {
            return Err(Error::IndexOutOfBounds {
                index,
                len: children.len,
            });
        }
        let target = self.chain(children.head).nth(index);
        if let Some(target) = target {
            self.unlink(target);
        }
        Ok(())
    }

    /// Deep-copy `v` (payload and key) into a new, unattached value.
    pub fn copy_value(&mut self, v: ValueRef) -> Result<ValueRef> {
        let source = self.resolve_mut(v)?;
        let copy = self.copy_subtree(source);
        Ok(self.handle(copy))
    }

    /// Move `v` (payload and key) into a new, unattached value in O(1).
    /// `v` goes stale.
    pub fn move_value(&mut self, v: ValueRef) -> Result<ValueRef> {
        let source = self.resolve_mut(v)?;
        let moved = self.relocate(source);
        Ok(self.handle(moved))
    }

    /// Move the payload and key of slot `source` into a fresh root slot.
    fn relocate(&mut self, source: usize) -> usize {
        let key = self.node(source).and_then(|n| n.key);
        let data = self.take_data(source);
        let mut node = Node::new(Data::Null);
        node.key = key;
        let index = self.alloc(node);
        self.install(index, data);
        index
    }
}
