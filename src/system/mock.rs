//! Scripted in-memory source for tests and for platforms without a tick
//! counter reader.

use super::{
    CoreTicks, CpuTickSample, DiskTotals, LoadAverages, MemoryTotals, NetInterface,
    ProcessSample, SourceError, StaticInfo, SystemSource,
};

/// Deterministic [`SystemSource`]: successive `cpu_ticks` calls walk a
/// scripted sequence (the last entry repeats once exhausted), and disk or
/// process reads can be toggled to fail.
pub struct MockSource {
    tick_script: Vec<Vec<CpuTickSample>>,
    cursor: usize,
    memory: MemoryTotals,
    uptime_secs: u64,
    load: LoadAverages,
    disk: DiskTotals,
    processes: Vec<ProcessSample>,
    interfaces: Vec<NetInterface>,
    static_info: StaticInfo,
    disk_fails: bool,
    processes_fail: bool,
}

impl MockSource {
    /// A plausible quiet 4-core machine.
    pub fn typical_system() -> Self {
        let step = |offset: u64| -> Vec<CpuTickSample> {
            (0..4)
                .map(|core| {
                    tick_sample(
                        1_000 + offset * 20 + core,
                        500 + offset * 10,
                        8_000 + offset * 70,
                    )
                })
                .collect()
        };
        MockSource {
            tick_script: (0..8).map(step).collect(),
            cursor: 0,
            memory: MemoryTotals {
                total: 16 * 1024 * 1024 * 1024,
                free: 10 * 1024 * 1024 * 1024,
            },
            uptime_secs: 90_061,
            load: LoadAverages {
                one: 0.52,
                five: 0.48,
                fifteen: 0.45,
            },
            disk: DiskTotals {
                total: 512 * 1024 * 1024 * 1024,
                free: 384 * 1024 * 1024 * 1024,
            },
            processes: vec![
                process_sample(1, "init", 0.1, 12 << 20, "root"),
                process_sample(400, "vitals", 1.4, 24 << 20, "svc"),
                process_sample(812, "postgres", 3.2, 256 << 20, "postgres"),
            ],
            interfaces: vec![
                NetInterface {
                    name: "lo".to_string(),
                    address: "127.0.0.1".to_string(),
                    netmask: "255.0.0.0".to_string(),
                    family: "IPv4".to_string(),
                    mac: "00:00:00:00:00:00".to_string(),
                    internal: true,
                    cidr: "127.0.0.1/8".to_string(),
                },
                NetInterface {
                    name: "eth0".to_string(),
                    address: "10.0.0.5".to_string(),
                    netmask: "255.255.255.0".to_string(),
                    family: "IPv4".to_string(),
                    mac: "52:54:00:12:34:56".to_string(),
                    internal: false,
                    cidr: "10.0.0.5/24".to_string(),
                },
            ],
            static_info: StaticInfo {
                platform: "linux".to_string(),
                os_type: "Ubuntu".to_string(),
                release: "24.04".to_string(),
                hostname: "mockhost".to_string(),
                architecture: "x86_64".to_string(),
                home_directory: "/home/svc".to_string(),
                tmp_directory: "/tmp".to_string(),
            },
            disk_fails: false,
            processes_fail: false,
        }
    }

    pub fn with_tick_script(mut self, script: Vec<Vec<CpuTickSample>>) -> Self {
        self.tick_script = script;
        self.cursor = 0;
        self
    }

    pub fn with_memory(mut self, total: u64, free: u64) -> Self {
        self.memory = MemoryTotals { total, free };
        self
    }

    pub fn with_uptime(mut self, secs: u64) -> Self {
        self.uptime_secs = secs;
        self
    }

    pub fn with_load(mut self, one: f64, five: f64, fifteen: f64) -> Self {
        self.load = LoadAverages { one, five, fifteen };
        self
    }

    pub fn with_disk(mut self, total: u64, free: u64) -> Self {
        self.disk = DiskTotals { total, free };
        self
    }

    pub fn with_processes(mut self, processes: Vec<ProcessSample>) -> Self {
        self.processes = processes;
        self
    }

    pub fn fail_disk(mut self) -> Self {
        self.disk_fails = true;
        self
    }

    pub fn fail_processes(mut self) -> Self {
        self.processes_fail = true;
        self
    }
}

impl SystemSource for MockSource {
    fn cpu_ticks(&mut self) -> Result<Vec<CpuTickSample>, SourceError> {
        let index = self.cursor.min(self.tick_script.len().saturating_sub(1));
        self.cursor += 1;
        self.tick_script
            .get(index)
            .cloned()
            .ok_or_else(|| SourceError::new("cpu_ticks", "empty tick script"))
    }

    fn memory(&mut self) -> Result<MemoryTotals, SourceError> {
        Ok(self.memory)
    }

    fn uptime_secs(&mut self) -> Result<u64, SourceError> {
        Ok(self.uptime_secs)
    }

    fn load_averages(&mut self) -> Result<LoadAverages, SourceError> {
        Ok(self.load)
    }

    fn disk(&mut self) -> Result<DiskTotals, SourceError> {
        if self.disk_fails {
            return Err(SourceError::new("disk", "mock disk failure"));
        }
        Ok(self.disk)
    }

    fn processes(&mut self) -> Result<Vec<ProcessSample>, SourceError> {
        if self.processes_fail {
            return Err(SourceError::new("processes", "mock process failure"));
        }
        Ok(self.processes.clone())
    }

    fn network_interfaces(&mut self) -> Result<Vec<NetInterface>, SourceError> {
        Ok(self.interfaces.clone())
    }

    fn static_info(&self) -> StaticInfo {
        self.static_info.clone()
    }
}

/// One core's sample from user/system/idle ticks; the remaining categories
/// stay zero.
pub fn tick_sample(user: u64, system: u64, idle: u64) -> CpuTickSample {
    CpuTickSample {
        ticks: CoreTicks {
            user,
            system,
            idle,
            ..CoreTicks::default()
        },
        frequency_mhz: 2400,
        model: "Mock CPU @ 2.40GHz".to_string(),
    }
}

pub fn process_sample(
    pid: u32,
    name: &str,
    cpu_percent: f32,
    memory_bytes: u64,
    user: &str,
) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.to_string(),
        cpu_percent,
        memory_bytes,
        status: "Run".to_string(),
        user: user.to_string(),
    }
}
