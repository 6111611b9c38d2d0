//! Snapshot assembly: turns raw source readings into the derived wire models
//! the dashboard polls for.
//!
//! The engine owns the CPU estimator baseline and the rolling history behind
//! mutexes, so overlapping HTTP-triggered collections and scheduled poller
//! ticks stay serialized per shared resource. Only the disk and process
//! readings may fail without failing the whole cycle; they degrade to
//! null/empty instead.

use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::format::{format_gb, format_pct, round2};
use crate::metrics::cpu::CpuEstimator;
use crate::metrics::health;
use crate::metrics::history::{HistoryBuffer, HistoryPoint, MAX_POINTS};
use crate::system::{
    CoreTicks, CpuTickSample, DiskTotals, LoadAverages, MemoryTotals, ProcessSample, SourceError,
    StaticInfo, SystemSource,
};

// ============================================================
// Wire models
// ============================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfoReport {
    pub platform: String,
    #[serde(rename = "type")]
    pub os_type: String,
    pub release: String,
    pub hostname: String,
    pub architecture: String,
    pub home_directory: String,
    pub tmp_directory: String,
}

impl From<StaticInfo> for SystemInfoReport {
    fn from(info: StaticInfo) -> Self {
        SystemInfoReport {
            platform: info.platform,
            os_type: info.os_type,
            release: info.release,
            hostname: info.hostname,
            architecture: info.architecture,
            home_directory: info.home_directory,
            tmp_directory: info.tmp_directory,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoreTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl From<CoreTicks> for CoreTimes {
    fn from(t: CoreTicks) -> Self {
        CoreTimes {
            user: t.user,
            nice: t.nice,
            system: t.system,
            idle: t.idle,
            iowait: t.iowait,
            irq: t.irq,
            softirq: t.softirq,
            steal: t.steal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoreDetail {
    pub core: usize,
    pub model: String,
    pub speed: u64,
    pub times: CoreTimes,
}

#[derive(Debug, Clone, Serialize)]
pub struct CpuReport {
    pub model: String,
    pub cores: usize,
    pub speed: u64,
    pub usage: i64,
    pub details: Vec<CoreDetail>,
}

impl CpuReport {
    fn new(samples: &[CpuTickSample], usage: i64) -> Self {
        let model = samples.first().map(|s| s.model.clone()).unwrap_or_default();
        let speed = samples.first().map(|s| s.frequency_mhz).unwrap_or(0);
        CpuReport {
            model,
            cores: samples.len(),
            speed,
            usage,
            details: samples
                .iter()
                .enumerate()
                .map(|(core, s)| CoreDetail {
                    core,
                    model: s.model.clone(),
                    speed: s.frequency_mhz,
                    times: s.ticks.into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSummary {
    pub model: String,
    pub cores: usize,
    pub speed: u64,
    pub usage: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryReport {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub used_percentage: String,
    #[serde(rename = "totalGB")]
    pub total_gb: String,
    #[serde(rename = "freeGB")]
    pub free_gb: String,
    #[serde(rename = "usedGB")]
    pub used_gb: String,
}

impl From<MemoryTotals> for MemoryReport {
    fn from(mem: MemoryTotals) -> Self {
        MemoryReport {
            total: mem.total,
            free: mem.free,
            used: mem.used(),
            used_percentage: format_pct(mem.used_pct()),
            total_gb: format_gb(mem.total),
            free_gb: format_gb(mem.free),
            used_gb: format_gb(mem.used()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UptimeParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UptimeReport {
    pub seconds: u64,
    pub formatted: UptimeParts,
}

impl UptimeReport {
    fn from_secs(seconds: u64) -> Self {
        UptimeReport {
            seconds,
            formatted: UptimeParts {
                days: seconds / 86_400,
                hours: (seconds % 86_400) / 3_600,
                minutes: (seconds % 3_600) / 60,
                seconds: seconds % 60,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadStrings {
    #[serde(rename = "1min")]
    pub one_min: String,
    #[serde(rename = "5min")]
    pub five_min: String,
    #[serde(rename = "15min")]
    pub fifteen_min: String,
}

impl From<LoadAverages> for LoadStrings {
    fn from(load: LoadAverages) -> Self {
        LoadStrings {
            one_min: format_pct(load.one),
            five_min: format_pct(load.five),
            fifteen_min: format_pct(load.fifteen),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub average: LoadStrings,
    pub cores: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskReport {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percentage: String,
    #[serde(rename = "totalGB")]
    pub total_gb: String,
    #[serde(rename = "usedGB")]
    pub used_gb: String,
    #[serde(rename = "freeGB")]
    pub free_gb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<DiskTotals> for DiskReport {
    fn from(disk: DiskTotals) -> Self {
        DiskReport {
            total: disk.total,
            used: disk.used(),
            free: disk.free,
            used_percentage: format_pct(disk.used_pct()),
            total_gb: format_gb(disk.total),
            used_gb: format_gb(disk.used()),
            free_gb: format_gb(disk.free),
            note: None,
        }
    }
}

/// Trimmed disk block embedded in the combined snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSummary {
    #[serde(rename = "totalGB")]
    pub total_gb: String,
    #[serde(rename = "usedGB")]
    pub used_gb: String,
    #[serde(rename = "freeGB")]
    pub free_gb: String,
    pub used_percentage: String,
}

impl From<DiskTotals> for DiskSummary {
    fn from(disk: DiskTotals) -> Self {
        DiskSummary {
            total_gb: format_gb(disk.total),
            used_gb: format_gb(disk.used()),
            free_gb: format_gb(disk.free),
            used_percentage: format_pct(disk.used_pct()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceReport {
    pub name: String,
    pub address: String,
    pub netmask: String,
    pub family: String,
    pub mac: String,
    pub internal: bool,
    pub cidr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub interfaces: Vec<InterfaceReport>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub memory_usage: String,
    pub cpu_usage: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub score: u8,
    pub status: &'static str,
    pub metrics: HealthMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub data: Vec<HistoryPoint>,
    pub count: usize,
    pub max_points: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub mem: String,
    pub status: String,
    pub user: String,
}

/// The combined `/api/system/all` payload. Immutable once assembled; every
/// collection cycle produces a fresh instance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllStats {
    pub system_info: SystemInfoReport,
    pub cpu: CpuSummary,
    pub memory: MemoryReport,
    pub uptime: UptimeReport,
    pub load_average: LoadStrings,
    pub network_interfaces: usize,
    pub health: u8,
    pub disk: Option<DiskSummary>,
    pub history: Vec<HistoryPoint>,
    pub processes: Vec<ProcessReport>,
    pub timestamp: String,
}

// ============================================================
// Engine
// ============================================================

/// Orchestrates one collection cycle and serves the per-endpoint partial
/// readings. Owns the estimator baseline and the history buffer; the source
/// is shared behind its own lock so interactive requests and poller ticks
/// never interleave a read.
pub struct Engine {
    source: Mutex<Box<dyn SystemSource>>,
    estimator: Mutex<CpuEstimator>,
    history: Mutex<HistoryBuffer>,
    top_processes: usize,
}

impl Engine {
    pub fn new(source: Box<dyn SystemSource>, top_processes: usize) -> Self {
        Engine {
            source: Mutex::new(source),
            estimator: Mutex::new(CpuEstimator::new()),
            history: Mutex::new(HistoryBuffer::new()),
            top_processes,
        }
    }

    pub fn system_info(&self) -> SystemInfoReport {
        self.source.lock().unwrap().static_info().into()
    }

    pub fn cpu(&self) -> Result<CpuReport, SourceError> {
        let samples = self.source.lock().unwrap().cpu_ticks()?;
        let usage = self.estimator.lock().unwrap().estimate(&samples);
        Ok(CpuReport::new(&samples, usage))
    }

    pub fn memory(&self) -> Result<MemoryReport, SourceError> {
        Ok(self.source.lock().unwrap().memory()?.into())
    }

    pub fn uptime(&self) -> Result<UptimeReport, SourceError> {
        Ok(UptimeReport::from_secs(
            self.source.lock().unwrap().uptime_secs()?,
        ))
    }

    pub fn load(&self) -> Result<LoadReport, SourceError> {
        let mut source = self.source.lock().unwrap();
        let load = source.load_averages()?;
        let cores = source.cpu_ticks()?.len();
        Ok(LoadReport {
            average: load.into(),
            cores,
        })
    }

    pub fn disk(&self) -> Result<DiskReport, SourceError> {
        Ok(self.source.lock().unwrap().disk()?.into())
    }

    pub fn network(&self) -> Result<NetworkReport, SourceError> {
        let interfaces = self.source.lock().unwrap().network_interfaces()?;
        let reports: Vec<InterfaceReport> = interfaces
            .into_iter()
            .map(|i| InterfaceReport {
                name: i.name,
                address: i.address,
                netmask: i.netmask,
                family: i.family,
                mac: i.mac,
                internal: i.internal,
                cidr: i.cidr,
            })
            .collect();
        let count = reports.len();
        Ok(NetworkReport {
            interfaces: reports,
            count,
        })
    }

    pub fn health(&self) -> Result<HealthReport, SourceError> {
        let (samples, mem, disk) = {
            let mut source = self.source.lock().unwrap();
            let samples = source.cpu_ticks()?;
            let mem = source.memory()?;
            let disk = source.disk().ok();
            (samples, mem, disk)
        };
        let usage = self.estimator.lock().unwrap().estimate(&samples);
        let disk_pct = disk.map(|d| d.used_pct()).unwrap_or(0.0);
        let score = health::score(mem.used_pct(), usage as f64, disk_pct);
        Ok(HealthReport {
            score,
            status: health::status(score),
            metrics: HealthMetrics {
                memory_usage: format_pct(mem.used_pct()),
                cpu_usage: usage,
            },
        })
    }

    /// Process table, top-N by CPU descending with memory as the tie-break.
    pub fn processes(&self) -> Result<Vec<ProcessReport>, SourceError> {
        let (samples, mem) = {
            let mut source = self.source.lock().unwrap();
            (source.processes()?, source.memory()?)
        };
        Ok(self.rank_processes(samples, mem.total))
    }

    pub fn history(&self) -> HistoryReport {
        let data = self.history.lock().unwrap().snapshot();
        let count = data.len();
        HistoryReport {
            data,
            count,
            max_points: MAX_POINTS,
        }
    }

    /// One full collection cycle: advances the estimator, appends to history,
    /// and returns the combined snapshot. Disk and process readings degrade
    /// to null/empty on failure; any other source error fails the cycle.
    pub fn collect(&self) -> Result<AllStats, SourceError> {
        let (static_info, samples, mem, uptime_secs, load, disk, processes, interfaces) = {
            let mut source = self.source.lock().unwrap();
            (
                source.static_info(),
                source.cpu_ticks()?,
                source.memory()?,
                source.uptime_secs()?,
                source.load_averages()?,
                source.disk(),
                source.processes(),
                source.network_interfaces()?,
            )
        };

        let usage = self.estimator.lock().unwrap().estimate(&samples);

        let disk = match disk {
            Ok(d) => Some(d),
            Err(e) => {
                warn!(error = %e, "disk read failed; reporting null");
                None
            }
        };
        let processes = match processes {
            Ok(p) => self.rank_processes(p, mem.total),
            Err(e) => {
                warn!(error = %e, "process read failed; reporting empty list");
                Vec::new()
            }
        };

        let disk_pct = disk.map(|d| d.used_pct()).unwrap_or(0.0);
        let score = health::score(mem.used_pct(), usage as f64, disk_pct);
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let history = {
            let mut buffer = self.history.lock().unwrap();
            buffer.append(HistoryPoint {
                cpu_usage: usage,
                memory_usage: round2(mem.used_pct()),
                load_avg: load.one,
                timestamp: timestamp.clone(),
            });
            buffer.snapshot()
        };

        let interface_count = {
            let mut names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            names.len()
        };

        Ok(AllStats {
            system_info: static_info.into(),
            cpu: CpuSummary {
                model: samples.first().map(|s| s.model.clone()).unwrap_or_default(),
                cores: samples.len(),
                speed: samples.first().map(|s| s.frequency_mhz).unwrap_or(0),
                usage,
            },
            memory: mem.into(),
            uptime: UptimeReport::from_secs(uptime_secs),
            load_average: load.into(),
            network_interfaces: interface_count,
            health: score,
            disk: disk.map(DiskSummary::from),
            history,
            processes,
            timestamp,
        })
    }

    fn rank_processes(&self, mut samples: Vec<ProcessSample>, total_memory: u64) -> Vec<ProcessReport> {
        samples.sort_by(|a, b| {
            b.cpu_percent
                .total_cmp(&a.cpu_percent)
                .then(b.memory_bytes.cmp(&a.memory_bytes))
        });
        samples.truncate(self.top_processes);
        samples
            .into_iter()
            .map(|p| {
                let mem_pct = if total_memory == 0 {
                    0.0
                } else {
                    p.memory_bytes as f64 / total_memory as f64 * 100.0
                };
                ProcessReport {
                    pid: p.pid,
                    name: p.name,
                    cpu: format_pct(f64::from(p.cpu_percent)),
                    mem: format_pct(mem_pct),
                    status: p.status,
                    user: p.user,
                }
            })
            .collect()
    }
}
