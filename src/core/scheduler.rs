use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A task waiting in a [`TaskScheduler`]
struct Entry<T> {
    due: f64,
    sequence: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest task first; ties keep
    // scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Delayed task queue driven by the simulation clock.
///
/// Nothing runs on its own: the owner advances the clock and collects the
/// tasks that became due, so timed effects never race the collision sweep.
pub struct TaskScheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> TaskScheduler<T> {
    /// Creates an empty scheduler
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Queues `task` to become due `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f64, task: T) {
        let entry = Entry {
            due: now + delay.max(0.0),
            sequence: self.next_sequence,
            task,
        };
        self.next_sequence += 1;
        self.queue.push(entry);
    }

    /// Removes and returns every task due at or before `now`, earliest first
    pub fn pop_due(&mut self, now: f64) -> Vec<T> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|entry| entry.due <= now) {
            if let Some(entry) = self.queue.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// Drops every pending task matching the predicate
    pub fn cancel<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.queue.retain(|entry| !predicate(&entry.task));
    }

    /// Time at which the next task becomes due
    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|entry| entry.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
