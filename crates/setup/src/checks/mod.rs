//! Pre-flight requirement checks.
//!
//! Every probe is an independent predicate over the host; a failing probe
//! never stops the ones after it. The aggregated report is advisory: the
//! `check` subcommand turns it into an exit code, nothing else consumes it.

pub mod network;
pub mod report;
pub mod resources;
pub mod software;

use std::path::Path;

use crate::hardware::HostProfile;
use report::{CheckReport, CheckResult, StatusSink};

/// Run the full probe set in presentation order.
pub fn run_all(profile: &HostProfile, dir: &Path, sink: &mut dyn StatusSink) -> CheckReport {
    let mut report = CheckReport::new();

    sink.section("Pre-Flight Checks");
    check_os(profile, &mut report, sink);
    software::check_docker(&mut report, sink);
    software::check_compose(&mut report, sink);
    software::check_required_files(dir, &mut report, sink);
    network::check_ports(&mut report, sink);
    resources::check_disk(profile, &mut report, sink);
    resources::check_memory(profile, &mut report, sink);
    network::check_connectivity(&mut report, sink);

    report
}

pub fn check_os(profile: &HostProfile, report: &mut CheckReport, sink: &mut dyn StatusSink) {
    let result = match profile.platform {
        Some(platform) => CheckResult::pass_with("Operating System", platform.to_string()),
        None => CheckResult::fail(
            "Operating System",
            format!("unsupported OS: {}", std::env::consts::OS),
        ),
    };
    report.record(sink, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::storage::StorageMedium;
    use crate::platform::{LinuxDistro, Platform};
    use report::BufferSink;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn synthetic_profile() -> HostProfile {
        HostProfile {
            platform: Some(Platform::Linux(LinuxDistro::Ubuntu)),
            physical_cores: 8,
            logical_cores: 16,
            cpu_model: "test".to_string(),
            total_memory: 32 * GIB,
            available_memory: 16 * GIB,
            storage: StorageMedium::NvmeSsd,
            disk_total: 900 * GIB,
            disk_free: 400 * GIB,
        }
    }

    /// A failing probe must not short-circuit the probes after it: with one
    /// required file missing, everything else still runs and reports.
    #[test]
    fn test_checks_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docker-compose.yml"), "").unwrap();
        std::fs::write(dir.path().join(".env.example"), "").unwrap();
        // Dockerfile deliberately absent.

        let profile = synthetic_profile();
        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();

        check_os(&profile, &mut report, &mut sink);
        software::check_required_files(dir.path(), &mut report, &mut sink);
        network::check_ports(&mut report, &mut sink);
        resources::check_disk(&profile, &mut report, &mut sink);
        resources::check_memory(&profile, &mut report, &mut sink);

        // 1 OS + 3 files + 4 ports + disk + memory.
        assert_eq!(report.total(), 10);
        assert!(!report.get("File: Dockerfile").unwrap().passed);
        assert!(report.get("Operating System").unwrap().passed);
        assert!(report.get("Disk Space").unwrap().passed);
        assert!(report.get("System Memory").unwrap().passed);
        for port in crate::config::REQUIRED_PORTS {
            assert!(report.get(&format!("Port {port}")).is_some());
        }
    }
}
