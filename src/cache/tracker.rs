//! LRU Tracker Module
//!
//! Doubly-linked recency order for the LRU cache.

// == Node Handle ==
/// Stable handle to a value held by an [`LruTracker`].
///
/// Handles stay valid until the value is removed. A handle may be reused for a
/// later value once its slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Nodes live in a slot vector and link to each other by index:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// `push_front`, `touch`, `remove` and `evict_oldest` are all O(1).
#[derive(Debug)]
pub struct LruTracker<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> Default for LruTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruTracker<T> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tracker with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let node = Node {
            value,
            prev: None,
            next: None,
        };

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };

        self.attach_front(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Marks a node as recently used (moves to front).
    ///
    /// Returns `false` if the handle is not in the tracker.
    pub fn touch(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    // == Remove ==
    /// Removes a node and returns its value.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }

        self.detach(id);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used value.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    // == Peek Oldest ==
    /// Returns the least recently used value without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    // == Length ==
    /// Returns the number of tracked values.
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Drops every value and invalidates all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tracker: self,
            current: self.head,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    // Unlinks a node from its neighbours; the node itself stays in its slot.
    fn detach(&mut self, id: NodeId) {
        let (prev, next) = match self.node_mut(id) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
    }

    fn attach_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruTracker`].
pub struct Iter<'a, T> {
    tracker: &'a LruTracker<T>,
    current: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tracker.node(self.current?)?;
        self.current = node.next;
        Some(&node.value)
    }
}
