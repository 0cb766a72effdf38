//! Host introspection and performance scoring.
//!
//! `SystemProbe` is the only place that talks to the operating system;
//! everything downstream (the scorer, the report rendering) works on the
//! plain `HostProfile` snapshot, so tests can feed synthetic profiles.

pub mod score;
pub mod storage;

use std::path::Path;

use sysinfo::System;

use crate::platform::Platform;
use storage::{DiskSpace, StorageMedium};

pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Snapshot of the host, recomputed fresh on every run.
#[derive(Debug, Clone)]
pub struct HostProfile {
    pub platform: Option<Platform>,
    pub physical_cores: usize,
    pub logical_cores: usize,
    pub cpu_model: String,
    /// Bytes.
    pub total_memory: u64,
    /// Bytes.
    pub available_memory: u64,
    pub storage: StorageMedium,
    /// Bytes, on the working volume.
    pub disk_total: u64,
    /// Bytes, on the working volume.
    pub disk_free: u64,
}

impl HostProfile {
    pub fn total_memory_gib(&self) -> f64 {
        self.total_memory as f64 / BYTES_PER_GIB
    }

    pub fn available_memory_gib(&self) -> f64 {
        self.available_memory as f64 / BYTES_PER_GIB
    }

    pub fn disk_free_gib(&self) -> f64 {
        self.disk_free as f64 / BYTES_PER_GIB
    }
}

/// Host introspection boundary. Detection failures surface as conservative
/// defaults (`Unknown` storage, zeroed disk figures), never as errors.
pub trait HardwareProbe {
    fn profile(&self) -> HostProfile;
}

/// The real probe, backed by sysinfo plus the platform-specific storage
/// queries in [`storage`].
pub struct SystemProbe {
    sys: System,
}

impl SystemProbe {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self { sys }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareProbe for SystemProbe {
    fn profile(&self) -> HostProfile {
        let logical_cores = self.sys.cpus().len();
        let physical_cores = self.sys.physical_core_count().unwrap_or(logical_cores);
        let cpu_model = self
            .sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let cwd = Path::new(".");
        let disk = storage::disk_space(cwd).unwrap_or_else(|e| {
            log::warn!("free-space query failed: {e}");
            DiskSpace { total: 0, free: 0 }
        });

        HostProfile {
            platform: Platform::detect(),
            physical_cores,
            logical_cores,
            cpu_model,
            total_memory: self.sys.total_memory(),
            available_memory: self.sys.available_memory(),
            storage: storage::detect_medium(cwd),
            disk_total: disk.total,
            disk_free: disk.free,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_probe_detects_something() {
        let profile = SystemProbe::new().profile();
        assert!(profile.logical_cores > 0);
        assert!(profile.physical_cores > 0);
        assert!(profile.total_memory > 0);
        assert!(profile.physical_cores <= profile.logical_cores);
    }

    #[test]
    fn test_gib_conversions() {
        let profile = HostProfile {
            platform: None,
            physical_cores: 4,
            logical_cores: 8,
            cpu_model: "test".to_string(),
            total_memory: 16 * 1024 * 1024 * 1024,
            available_memory: 8 * 1024 * 1024 * 1024,
            storage: StorageMedium::Unknown,
            disk_total: 0,
            disk_free: 0,
        };
        assert_eq!(profile.total_memory_gib(), 16.0);
        assert_eq!(profile.available_memory_gib(), 8.0);
    }
}
