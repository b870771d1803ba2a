use crate::filter::RejectReason;
use std::collections::VecDeque;

/// A rejected URL and why it was identified as a trap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapRecord {
    pub url: String,
    pub reason: RejectReason,
}

impl TrapRecord {
    pub fn new(url: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

/// Identified traps for one crawl
///
/// Keeps every trap in discovery order, plus a bounded FIFO window of the
/// most recent trap URLs that the admission filter compares candidates against.
#[derive(Debug, Clone)]
pub struct TrapLog {
    identified: Vec<TrapRecord>,
    recent: VecDeque<String>,
    capacity: usize,
}

impl TrapLog {
    /// Creates an empty log whose window holds at most `capacity` URLs
    pub fn new(capacity: usize) -> Self {
        Self {
            identified: Vec::new(),
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a filter-identified trap in both the log and the window
    ///
    /// The oldest window entry is evicted once the window is full.
    pub fn record_trap(&mut self, record: TrapRecord) {
        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(record.url.clone());
        }
        self.identified.push(record);
    }

    /// Records a self-fragment loop found during extraction
    ///
    /// Loops go to the log only: their fragment-stripped form is a page
    /// already being crawled, so they must not suppress its neighbours.
    pub fn record_fragment_loop(&mut self, url: impl Into<String>) {
        self.identified
            .push(TrapRecord::new(url, RejectReason::SelfFragmentLoop));
    }

    /// All identified traps, oldest first
    pub fn identified(&self) -> &[TrapRecord] {
        &self.identified
    }

    /// Window of recent trap URLs, oldest first
    pub fn recent(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.recent.iter().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap(url: &str) -> TrapRecord {
        TrapRecord::new(url, RejectReason::TooLong { length: 500 })
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut log = TrapLog::new(3);
        for url in ["a", "b", "c", "d", "e"] {
            log.record_trap(trap(url));
        }

        assert_eq!(log.recent().collect::<Vec<_>>(), vec!["c", "d", "e"]);
        assert_eq!(log.identified().len(), 5);
        assert_eq!(log.identified()[0].url, "a");
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut log = TrapLog::new(20);
        for i in 0..100 {
            log.record_trap(trap(&format!("http://t{}.ics.uci.edu/", i)));
            assert!(log.recent().len() <= 20);
        }
        assert_eq!(log.recent().len(), 20);
    }

    #[test]
    fn test_fragment_loops_skip_window() {
        let mut log = TrapLog::new(20);
        log.record_fragment_loop("http://x.ics.uci.edu/a#section2");

        assert_eq!(log.recent().len(), 0);
        assert_eq!(log.identified().len(), 1);
        assert_eq!(log.identified()[0].reason, RejectReason::SelfFragmentLoop);
    }
}
