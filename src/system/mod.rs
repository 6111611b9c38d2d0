//! Raw sample acquisition: un-interpreted OS readings behind a trait seam so
//! the metrics engine can run against the live host or a scripted mock.

pub mod host;
pub mod mock;
pub mod platform;

use std::fmt;

pub use host::HostSource;
pub use mock::MockSource;

/// A raw reading could not be obtained from the underlying provider.
#[derive(Debug)]
pub struct SourceError {
    reading: &'static str,
    detail: String,
}

impl SourceError {
    pub fn new(reading: &'static str, detail: impl Into<String>) -> Self {
        Self {
            reading,
            detail: detail.into(),
        }
    }

    /// Which reading failed ("disk", "processes", ...).
    pub fn reading(&self) -> &'static str {
        self.reading
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reading failed: {}", self.reading, self.detail)
    }
}

impl std::error::Error for SourceError {}

/// Cumulative scheduler tick counters for one core, monotonically
/// non-decreasing since boot.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CoreTicks {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// One per-core reading: tick counters plus the core's clock speed and model
/// label.
#[derive(Debug, Clone)]
pub struct CpuTickSample {
    pub ticks: CoreTicks,
    pub frequency_mhz: u64,
    pub model: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryTotals {
    pub total: u64,
    pub free: u64,
}

impl MemoryTotals {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    pub fn used_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used() as f64 / self.total as f64 * 100.0
    }
}

/// 1/5/15-minute load averages. All-zero on platforms that do not report
/// load; that is a valid reading, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAverages {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Primary-volume capacity totals.
#[derive(Debug, Clone, Copy)]
pub struct DiskTotals {
    pub total: u64,
    pub free: u64,
}

impl DiskTotals {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    pub fn used_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used() as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
    pub status: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct NetInterface {
    pub name: String,
    pub address: String,
    pub netmask: String,
    pub family: String,
    pub mac: String,
    pub internal: bool,
    pub cidr: String,
}

/// Static system identity, stable for the life of the process.
#[derive(Debug, Clone)]
pub struct StaticInfo {
    pub platform: String,
    pub os_type: String,
    pub release: String,
    pub hostname: String,
    pub architecture: String,
    pub home_directory: String,
    pub tmp_directory: String,
}

/// Supplier of one un-interpreted reading per call. Implementations may hit
/// the OS; callers run them off the async runtime.
///
/// Only `disk` and `processes` are expected to fail in practice. The other
/// readings come from always-available local OS calls; an error there is
/// fatal to the collection cycle that requested it.
pub trait SystemSource: Send {
    fn cpu_ticks(&mut self) -> Result<Vec<CpuTickSample>, SourceError>;
    fn memory(&mut self) -> Result<MemoryTotals, SourceError>;
    fn uptime_secs(&mut self) -> Result<u64, SourceError>;
    fn load_averages(&mut self) -> Result<LoadAverages, SourceError>;
    fn disk(&mut self) -> Result<DiskTotals, SourceError>;
    fn processes(&mut self) -> Result<Vec<ProcessSample>, SourceError>;
    fn network_interfaces(&mut self) -> Result<Vec<NetInterface>, SourceError>;
    fn static_info(&self) -> StaticInfo;
}
