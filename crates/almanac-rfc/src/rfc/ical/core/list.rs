//! Insertion-ordered list with stable handles.
//!
//! Nodes live in a slab and are linked both ways by index. A [`Handle`]
//! stays valid until its own element is removed; removing or inserting
//! other elements never invalidates it. Each slot carries a generation so
//! a handle to a removed element is rejected instead of aliasing whatever
//! reuses the slot.

use std::cmp::Ordering;
use std::fmt;

use almanac_core::error::CoreError;

/// Cursor to one element of an [`OrderedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

#[derive(Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

#[derive(Clone)]
pub struct OrderedList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedList<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn handle(&self, index: usize) -> Handle {
        Handle {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn node(&self, handle: Handle) -> Option<&Node<T>> {
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_at(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index).and_then(|s| s.node.as_ref())
    }

    fn node_at_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index).and_then(|s| s.node.as_mut())
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    fn link(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> Handle {
        let index = self.allocate(Node { value, prev, next });
        match prev {
            Some(p) => {
                if let Some(node) = self.node_at_mut(p) {
                    node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_at_mut(n) {
                    node.prev = Some(index);
                }
            }
            None => self.tail = Some(index),
        }
        self.len += 1;
        self.handle(index)
    }

    /// Appends `value` at the tail.
    pub fn push(&mut self, value: T) -> Handle {
        self.link(value, self.tail, None)
    }

    /// ## Summary
    /// Appends `value`, reserving storage fallibly first.
    ///
    /// ## Errors
    /// Returns [`CoreError::Allocation`] when the storage cannot grow.
    pub fn try_push(&mut self, value: T) -> Result<Handle, CoreError> {
        if self.free.is_empty() {
            self.slots
                .try_reserve(1)
                .map_err(|e| CoreError::Allocation(e.to_string()).report())?;
        }
        Ok(self.push(value))
    }

    /// Prepends `value` at the head.
    pub fn unshift(&mut self, value: T) -> Handle {
        self.link(value, None, self.head)
    }

    /// Removes and returns the tail element.
    pub fn pop(&mut self) -> Option<T> {
        let tail = self.tail?;
        let handle = self.handle(tail);
        self.remove(handle)
    }

    /// Removes and returns the head element.
    pub fn shift(&mut self) -> Option<T> {
        let head = self.head?;
        let handle = self.handle(head);
        self.remove(handle)
    }

    /// Inserts `value` right after `at`. Returns `None` if `at` is stale.
    pub fn insert_after(&mut self, at: Handle, value: T) -> Option<Handle> {
        let next = self.node(at)?.next;
        Some(self.link(value, Some(at.index), next))
    }

    /// Inserts `value` right before `at`. Returns `None` if `at` is stale.
    pub fn insert_before(&mut self, at: Handle, value: T) -> Option<Handle> {
        let prev = self.node(at)?.prev;
        Some(self.link(value, prev, Some(at.index)))
    }

    /// ## Summary
    /// Inserts `value` before the first element that `cmp` orders after
    /// it, keeping equal elements in insertion order.
    pub fn insert_ordered<F>(&mut self, value: T, mut cmp: F) -> Handle
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let Some(node) = self.node_at(index) else {
                break;
            };
            if cmp(&node.value, &value) == Ordering::Greater {
                let prev = node.prev;
                return self.link(value, prev, Some(index));
            }
            cursor = node.next;
        }
        self.push(value)
    }

    /// Unlinks the element at `at` and returns it.
    pub fn remove(&mut self, at: Handle) -> Option<T> {
        self.node(at)?;
        let slot = &mut self.slots[at.index];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(at.index);

        match node.prev {
            Some(p) => {
                if let Some(prev) = self.node_at_mut(p) {
                    prev.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => {
                if let Some(next) = self.node_at_mut(n) {
                    next.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.len -= 1;
        Some(node.value)
    }

    #[must_use]
    pub fn head(&self) -> Option<Handle> {
        self.head.map(|i| self.handle(i))
    }

    #[must_use]
    pub fn tail(&self) -> Option<Handle> {
        self.tail.map(|i| self.handle(i))
    }

    #[must_use]
    pub fn next(&self, at: Handle) -> Option<Handle> {
        self.node(at)?.next.map(|i| self.handle(i))
    }

    #[must_use]
    pub fn prior(&self, at: Handle) -> Option<Handle> {
        self.node(at)?.prev.map(|i| self.handle(i))
    }

    #[must_use]
    pub fn get(&self, at: Handle) -> Option<&T> {
        self.node(at).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, at: Handle) -> Option<&mut T> {
        self.node(at)?;
        self.node_at_mut(at.index).map(|n| &mut n.value)
    }

    /// Returns the first element matching `pred`.
    pub fn find<P>(&self, pred: P) -> Option<Handle>
    where
        P: FnMut(&T) -> bool,
    {
        self.scan(self.head, pred)
    }

    /// Returns the first element after `after` matching `pred`.
    pub fn find_next<P>(&self, after: Handle, pred: P) -> Option<Handle>
    where
        P: FnMut(&T) -> bool,
    {
        let start = self.node(after)?.next;
        self.scan(start, pred)
    }

    fn scan<P>(&self, mut cursor: Option<usize>, mut pred: P) -> Option<Handle>
    where
        P: FnMut(&T) -> bool,
    {
        while let Some(index) = cursor {
            let node = self.node_at(index)?;
            if pred(&node.value) {
                return Some(self.handle(index));
            }
            cursor = node.next;
        }
        None
    }

    /// Calls `f` on every element, head to tail.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let Some(node) = self.node_at_mut(index) else {
                break;
            };
            f(&mut node.value);
            cursor = node.next;
        }
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterates `(handle, element)` pairs head to tail.
    pub fn handles(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            let node = self.node_at(index)?;
            cursor = node.next;
            Some((self.handle(index), &node.value))
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OrderedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

pub struct Iter<'a, T> {
    list: &'a OrderedList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.list.node_at(index)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push(value);
        }
        list
    }
}
