/// A fixed-capacity circular buffer of pending jobs.
///
/// This is a plain ring buffer with no synchronization of its own. The pool
/// keeps it behind the same mutex that guards the batch collector, so all
/// thread safety lives in one place and the queue stays a dumb container.
pub(crate) struct BoundedQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue holding at most `capacity` items.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        BoundedQueue {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Inserts an item at the tail, or hands it back if the queue is full.
    ///
    /// Callers are expected to have already excluded the full case by
    /// waiting on the pool's "not full" condition.
    pub(crate) fn push(&mut self, item: T) -> std::result::Result<(), T> {
        if self.len == self.slots.len() {
            return Err(item);
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the item at the head, or `None` if empty.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        item
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
