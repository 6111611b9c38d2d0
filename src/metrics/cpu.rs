use crate::system::CpuTickSample;

/// Converts successive cumulative tick-counter readings into an instantaneous
/// usage percentage.
///
/// The estimator keeps the previous `(idle, total)` averages as its baseline.
/// The baseline advances on every call, including the first one.
pub struct CpuEstimator {
    baseline: Option<(f64, f64)>,
}

impl CpuEstimator {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Estimate usage from per-core tick counters.
    ///
    /// The first call has no baseline and always reports 0. Subsequent calls
    /// return `100 - trunc(100 * idle_delta / total_delta)` with truncation
    /// toward zero. The result is deliberately unclamped, and a zero total
    /// delta yields 100 (the truncated term of a non-finite ratio is 0),
    /// matching the dashboard's historical output bit-for-bit.
    ///
    /// An empty sample set is a caller bug; tick counters come from the local
    /// OS and always cover at least one core.
    pub fn estimate(&mut self, samples: &[CpuTickSample]) -> i64 {
        let cores = samples.len() as f64;
        let mut idle_sum = 0.0;
        let mut total_sum = 0.0;
        for sample in samples {
            idle_sum += sample.ticks.idle as f64;
            total_sum += sample.ticks.total() as f64;
        }
        let idle_avg = idle_sum / cores;
        let total_avg = total_sum / cores;

        let usage = match self.baseline {
            None => 0,
            Some((prev_idle, prev_total)) => {
                let idle_delta = idle_avg - prev_idle;
                let total_delta = total_avg - prev_total;
                let ratio = 100.0 * idle_delta / total_delta;
                let truncated = if ratio.is_finite() { ratio.trunc() as i64 } else { 0 };
                100 - truncated
            }
        };

        self.baseline = Some((idle_avg, total_avg));
        usage
    }
}

impl Default for CpuEstimator {
    fn default() -> Self {
        Self::new()
    }
}
