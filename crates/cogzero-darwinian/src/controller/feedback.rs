//! Fixed-capacity ring buffer of task outcomes

use std::collections::VecDeque;

/// Most recent task outcomes; the oldest is evicted on overflow
#[derive(Debug, Clone)]
pub struct FeedbackWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

impl FeedbackWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, succeeded: bool) {
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(succeeded);
    }

    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = bool>) {
        for outcome in outcomes {
            self.push(outcome);
        }
    }

    /// Rolling success rate, `None` while empty
    pub fn success_rate(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            return None;
        }
        let successes = self.outcomes.iter().filter(|o| **o).count();
        Some(successes as f64 / self.outcomes.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window() {
        let window = FeedbackWindow::new(4);
        assert!(window.is_empty());
        assert_eq!(window.success_rate(), None);
    }

    #[test]
    fn test_eviction_bounds_memory() {
        let mut window = FeedbackWindow::new(3);
        window.extend([false, false, true, true, true]);
        assert_eq!(window.len(), 3);
        assert_eq!(window.success_rate(), Some(1.0));
    }

    #[test]
    fn test_rolling_rate() {
        let mut window = FeedbackWindow::new(4);
        window.extend([true, false, true, true]);
        assert_eq!(window.success_rate(), Some(0.75));
        window.push(false);
        assert_eq!(window.success_rate(), Some(0.5));
    }
}
