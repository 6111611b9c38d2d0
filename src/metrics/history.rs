use std::collections::VecDeque;

use serde::Serialize;

/// Fixed capacity of the rolling history window.
pub const MAX_POINTS: usize = 20;

/// One derived sample kept for charting. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub cpu_usage: i64,
    pub memory_usage: f64,
    pub load_avg: f64,
    pub timestamp: String,
}

/// FIFO ring of the last [`MAX_POINTS`] derived samples. Appending past
/// capacity evicts exactly the oldest point. No clear operation; the buffer
/// lives as long as the process.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(MAX_POINTS),
        }
    }

    pub fn append(&mut self, point: HistoryPoint) {
        if self.points.len() == MAX_POINTS {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cpu: i64) -> HistoryPoint {
        HistoryPoint {
            cpu_usage: cpu,
            memory_usage: 50.0,
            load_avg: 0.5,
            timestamp: format!("2026-01-01T00:00:{:02}Z", cpu % 60),
        }
    }

    #[test]
    fn append_and_snapshot_preserve_order() {
        let mut buf = HistoryBuffer::new();
        buf.append(point(1));
        buf.append(point(2));
        let snap = buf.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].cpu_usage, 1);
        assert_eq!(snap[1].cpu_usage, 2);
    }

    #[test]
    fn ring_caps_at_capacity_with_fifo_eviction() {
        let mut buf = HistoryBuffer::new();
        for i in 0..25 {
            buf.append(point(i));
        }
        assert_eq!(buf.len(), MAX_POINTS);
        let snap = buf.snapshot();
        assert_eq!(snap[0].cpu_usage, 5);
        assert_eq!(snap[MAX_POINTS - 1].cpu_usage, 24);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut buf = HistoryBuffer::new();
        buf.append(point(1));
        let snap = buf.snapshot();
        buf.append(point(2));
        assert_eq!(snap.len(), 1);
        assert_eq!(buf.len(), 2);
    }
}
