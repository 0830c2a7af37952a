//! Auto-resizing FIFO ring buffer.
//!
//! Drives the breadth-first subdivision in the range search. Capacity doubles
//! when the buffer is full and halves once occupancy drops to a quarter of
//! capacity, never going below [`MIN_CAPACITY`].
//!
//! The queue is allocated per search and never shared, so it carries no
//! synchronization.

/// Smallest capacity the ring buffer will shrink to.
pub const MIN_CAPACITY: usize = 2;

/// Growable circular FIFO queue.
#[derive(Debug)]
pub struct RingQueue<T> {
    nodes: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingQueue<T> {
    /// Creates an empty queue with [`MIN_CAPACITY`] slots.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(MIN_CAPACITY);
        nodes.resize_with(MIN_CAPACITY, || None);
        Self {
            nodes,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Appends `item` at the back, growing the buffer if it is full.
    pub fn push(&mut self, item: T) {
        if self.len == self.nodes.len() {
            self.resize(self.len * 2);
        }
        self.nodes[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.nodes.len();
        self.len += 1;
    }

    /// Removes and returns the item at the front.
    ///
    /// Returns `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.nodes[self.head].take();
        self.head = (self.head + 1) % self.nodes.len();
        self.len -= 1;

        let capacity = self.nodes.len();
        if capacity > MIN_CAPACITY && self.len <= capacity / 4 {
            self.resize(capacity / 2);
        }

        item
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Moves the live items into a buffer of `capacity` slots, front first.
    fn resize(&mut self, capacity: usize) {
        let old_capacity = self.nodes.len();
        let mut nodes = Vec::with_capacity(capacity);
        for i in 0..self.len {
            nodes.push(self.nodes[(self.head + i) % old_capacity].take());
        }
        nodes.resize_with(capacity, || None);

        self.nodes = nodes;
        self.head = 0;
        self.tail = self.len % capacity;
    }
}

impl<T> Default for RingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
