/// Collector for the results of the batch currently in flight.
///
/// Each submitted work item owns exactly one index in `results`, so writes
/// are disjoint; the pool mutex orders the `completed` increments. Between
/// batches the collector is empty.
pub(crate) struct BatchState {
    results: Vec<u64>,
    completed: usize,
    expected: usize,
}

impl BatchState {
    pub(crate) fn new() -> Self {
        BatchState {
            results: Vec::new(),
            completed: 0,
            expected: 0,
        }
    }

    /// Resets the collector for a batch of `size` items.
    pub(crate) fn begin(&mut self, size: usize) {
        debug_assert!(self.is_done(), "batch started while another in flight");
        self.results = vec![0; size];
        self.completed = 0;
        self.expected = size;
    }

    /// Records the result of one job. Returns true when this was the last
    /// outstanding job of the batch.
    pub(crate) fn commit(&mut self, index: usize, value: u64) -> bool {
        self.results[index] = value;
        self.completed += 1;
        debug_assert!(self.completed <= self.expected);
        self.completed == self.expected
    }

    pub(crate) fn is_done(&self) -> bool {
        self.completed == self.expected
    }

    /// Moves the finished results out to the caller, leaving the collector
    /// empty for the next batch.
    pub(crate) fn take(&mut self) -> Vec<u64> {
        debug_assert!(self.is_done());
        self.expected = 0;
        self.completed = 0;
        std::mem::take(&mut self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::BatchState;

    #[test]
    fn commit_reports_completion_exactly_once() {
        let mut batch = BatchState::new();
        batch.begin(3);
        assert!(!batch.commit(1, 10));
        assert!(!batch.commit(0, 20));
        assert!(batch.commit(2, 30));
        assert_eq!(batch.take(), vec![20, 10, 30]);
    }

    #[test]
    fn take_resets_for_next_batch() {
        let mut batch = BatchState::new();
        batch.begin(1);
        batch.commit(0, 7);
        assert_eq!(batch.take(), vec![7]);
        batch.begin(2);
        assert!(!batch.is_done());
        batch.commit(0, 1);
        batch.commit(1, 2);
        assert_eq!(batch.take(), vec![1, 2]);
    }
}
