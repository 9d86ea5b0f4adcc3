use std::collections::VecDeque;

/// Bounded FIFO of the most recent closing prices.
///
/// Capacity is `threshold + 1`: just enough history to observe a
/// threshold-length run of adjacent moves. Once full, each push evicts
/// the single oldest close. Ordering is strictly chronological — the
/// window trusts ingestion order and never reorders or deduplicates.
#[derive(Debug, Clone)]
pub struct BarWindow {
    closes: VecDeque<f64>,
    capacity: usize,
}

impl BarWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "window capacity must be >= 2");
        Self {
            closes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a close, evicting the oldest once full. Cannot fail for any
    /// finite numeric input.
    pub fn push(&mut self, close: f64) {
        if self.closes.len() == self.capacity {
            self.closes.pop_front();
        }
        self.closes.push_back(close);
    }

    /// Closes in chronological order, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.closes.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_up_to_capacity() {
        let mut window = BarWindow::new(4);
        assert!(window.is_empty());
        for (i, price) in [1.0, 2.0, 3.0].iter().enumerate() {
            window.push(*price);
            assert_eq!(window.len(), i + 1);
        }
        assert_eq!(window.snapshot(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn evicts_oldest_in_fifo_order() {
        let mut window = BarWindow::new(4);
        for price in [1.0, 2.0, 3.0, 4.0, 5.0] {
            window.push(price);
        }
        assert_eq!(window.len(), 4);
        assert_eq!(window.snapshot(), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "capacity must be >= 2")]
    fn rejects_degenerate_capacity() {
        BarWindow::new(1);
    }
}
