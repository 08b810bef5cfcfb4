//! Host metric collection via `sysinfo`.
//!
//! [`HostCollector`] reads CPU, memory, one mount's disk usage and the
//! cumulative network byte counters. Every sub-reading is independent: a
//! missing mount or an empty interface list degrades that field to zero
//! instead of failing the whole read.

use std::path::{Path, PathBuf};

use sysinfo::{Disks, Networks, System};
use zerostat_core::template::UNKNOWN_HOST;

/// Raw counters from one read of the host, before rates are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawReading {
    pub cpu_percent: f64,
    pub cpu_cores: usize,
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
    /// Cumulative bytes received, summed across interfaces.
    pub net_rx_bytes: u64,
    /// Cumulative bytes transmitted, summed across interfaces.
    pub net_tx_bytes: u64,
}

/// A synchronous source of host readings. Never fails; unavailable fields
/// read as zero.
pub trait MetricsSource: Send {
    fn read(&mut self) -> RawReading;
}

/// `sysinfo`-backed source for the local machine.
pub struct HostCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    disk_mount: PathBuf,
}

impl HostCollector {
    pub fn new(disk_mount: impl Into<PathBuf>) -> Self {
        let mut system = System::new();
        // CPU usage is a delta between two refreshes; prime the first one.
        system.refresh_cpu_usage();

        let collector = Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            disk_mount: disk_mount.into(),
        };
        tracing::info!(
            cpu_cores = collector.system.cpus().len(),
            disk_mount = %collector.disk_mount.display(),
            "Host collector initialised"
        );
        collector
    }

    fn read_disk(&mut self) -> (u64, u64) {
        self.disks.refresh(true);
        match find_mount(&self.disks, &self.disk_mount) {
            Some(disk) => {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                (used, total)
            }
            None => {
                tracing::debug!(disk_mount = %self.disk_mount.display(), "Mount not found -- disk reads as zero");
                (0, 0)
            }
        }
    }

    fn read_network(&mut self) -> (u64, u64) {
        self.networks.refresh(true);
        self.networks
            .iter()
            .fold((0u64, 0u64), |(rx, tx), (_name, data)| {
                (
                    rx.saturating_add(data.total_received()),
                    tx.saturating_add(data.total_transmitted()),
                )
            })
    }
}

impl MetricsSource for HostCollector {
    fn read(&mut self) -> RawReading {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let (disk_used_bytes, disk_total_bytes) = self.read_disk();
        let (net_rx_bytes, net_tx_bytes) = self.read_network();

        RawReading {
            cpu_percent: f64::from(self.system.global_cpu_usage()),
            cpu_cores: self.system.cpus().len(),
            mem_used_bytes: self.system.used_memory(),
            mem_total_bytes: self.system.total_memory(),
            disk_used_bytes,
            disk_total_bytes,
            net_rx_bytes,
            net_tx_bytes,
        }
    }
}

fn find_mount<'a>(disks: &'a Disks, mount: &Path) -> Option<&'a sysinfo::Disk> {
    disks.list().iter().find(|disk| disk.mount_point() == mount)
}

/// Host name used in rendered messages.
pub fn hostname() -> String {
    System::host_name()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
