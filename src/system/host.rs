use std::net::IpAddr;

use sysinfo::{
    Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users,
};

use super::platform;
use super::{
    CpuTickSample, DiskTotals, LoadAverages, MemoryTotals, NetInterface, ProcessSample,
    SourceError, StaticInfo, SystemSource,
};

/// Production source reading the local machine: tick counters via the
/// platform module, everything else via `sysinfo`.
pub struct HostSource {
    sys: System,
    disks: Disks,
    networks: Networks,
    users: Users,
    static_info: StaticInfo,
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();

        let static_info = StaticInfo {
            platform: std::env::consts::OS.to_string(),
            os_type: System::name().unwrap_or_default(),
            release: System::os_version().unwrap_or_default(),
            hostname: System::host_name().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            home_directory: dirs::home_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            tmp_directory: std::env::temp_dir().display().to_string(),
        };

        HostSource {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
            static_info,
        }
    }
}

impl SystemSource for HostSource {
    fn cpu_ticks(&mut self) -> Result<Vec<CpuTickSample>, SourceError> {
        let cores = platform::read_core_ticks()?;
        self.sys.refresh_cpu_all();
        let cpus = self.sys.cpus();
        Ok(cores
            .into_iter()
            .enumerate()
            .map(|(index, ticks)| {
                let (frequency_mhz, model) = cpus
                    .get(index)
                    .map(|cpu| (cpu.frequency(), cpu.brand().to_string()))
                    .unwrap_or((0, String::new()));
                CpuTickSample {
                    ticks,
                    frequency_mhz,
                    model,
                }
            })
            .collect())
    }

    fn memory(&mut self) -> Result<MemoryTotals, SourceError> {
        self.sys.refresh_memory();
        Ok(MemoryTotals {
            total: self.sys.total_memory(),
            free: self.sys.free_memory(),
        })
    }

    fn uptime_secs(&mut self) -> Result<u64, SourceError> {
        Ok(System::uptime())
    }

    fn load_averages(&mut self) -> Result<LoadAverages, SourceError> {
        let load = System::load_average();
        Ok(LoadAverages {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn disk(&mut self) -> Result<DiskTotals, SourceError> {
        self.disks.refresh(true);
        let disks = self.disks.list();
        // Primary volume: the root mount where present, otherwise the first
        // listed disk.
        let primary = disks
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.first())
            .ok_or_else(|| SourceError::new("disk", "no disks reported"))?;
        Ok(DiskTotals {
            total: primary.total_space(),
            free: primary.available_space(),
        })
    }

    fn processes(&mut self) -> Result<Vec<ProcessSample>, SourceError> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
        let samples = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let user = process
                    .user_id()
                    .and_then(|uid| self.users.get_user_by_id(uid))
                    .map(|u| u.name().to_string())
                    .unwrap_or_default();
                ProcessSample {
                    pid: pid.as_u32(),
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: process.cpu_usage(),
                    memory_bytes: process.memory(),
                    status: format!("{:?}", process.status()),
                    user,
                }
            })
            .collect();
        Ok(samples)
    }

    fn network_interfaces(&mut self) -> Result<Vec<NetInterface>, SourceError> {
        self.networks.refresh(true);
        let mut interfaces = Vec::new();
        for (name, data) in &self.networks {
            let mac = data.mac_address().to_string();
            for ip in data.ip_networks() {
                let family = match ip.addr {
                    IpAddr::V4(_) => "IPv4",
                    IpAddr::V6(_) => "IPv6",
                };
                interfaces.push(NetInterface {
                    name: name.clone(),
                    address: ip.addr.to_string(),
                    netmask: netmask_for(ip.addr, ip.prefix),
                    family: family.to_string(),
                    mac: mac.clone(),
                    internal: ip.addr.is_loopback(),
                    cidr: format!("{}/{}", ip.addr, ip.prefix),
                });
            }
        }
        Ok(interfaces)
    }

    fn static_info(&self) -> StaticInfo {
        self.static_info.clone()
    }
}

fn netmask_for(addr: IpAddr, prefix: u8) -> String {
    match addr {
        IpAddr::V4(_) => {
            let mask = (!0u32)
                .checked_shl(32 - u32::from(prefix.min(32)))
                .unwrap_or(0);
            std::net::Ipv4Addr::from(mask).to_string()
        }
        IpAddr::V6(_) => {
            let mask = (!0u128)
                .checked_shl(128 - u32::from(prefix.min(128)))
                .unwrap_or(0);
            std::net::Ipv6Addr::from(mask).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_netmasks() {
        let addr: IpAddr = "192.168.1.10".parse().unwrap();
        assert_eq!(netmask_for(addr, 24), "255.255.255.0");
        assert_eq!(netmask_for(addr, 32), "255.255.255.255");
        assert_eq!(netmask_for(addr, 0), "0.0.0.0");
    }

    #[test]
    fn v6_netmask_full_prefix() {
        let addr: IpAddr = "::1".parse().unwrap();
        assert_eq!(
            netmask_for(addr, 128),
            "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn static_info_is_populated() {
        let source = HostSource::new();
        let info = source.static_info();
        assert!(!info.platform.is_empty());
        assert!(!info.architecture.is_empty());
    }
}
