//! Disk and memory thresholds against the collected profile.

use super::report::{CheckReport, CheckResult, StatusSink};
use crate::hardware::HostProfile;

pub const MIN_FREE_DISK_GIB: f64 = 10.0;
pub const MIN_AVAILABLE_MEMORY_GIB: f64 = 2.0;

pub fn check_disk(profile: &HostProfile, report: &mut CheckReport, sink: &mut dyn StatusSink) {
    let free_gib = profile.disk_free_gib();
    let result = if profile.disk_total == 0 {
        CheckResult::fail("Disk Space", "could not determine free disk space")
    } else if free_gib >= MIN_FREE_DISK_GIB {
        CheckResult::pass_with(
            "Disk Space",
            format!("{free_gib:.1} GiB available (>= {MIN_FREE_DISK_GIB:.0} GiB required)"),
        )
    } else {
        CheckResult::fail(
            "Disk Space",
            format!("{free_gib:.1} GiB available (requires >= {MIN_FREE_DISK_GIB:.0} GiB)"),
        )
    };
    report.record(sink, result);
}

pub fn check_memory(profile: &HostProfile, report: &mut CheckReport, sink: &mut dyn StatusSink) {
    let available_gib = profile.available_memory_gib();
    let result = if profile.total_memory == 0 {
        CheckResult::fail("System Memory", "could not determine available memory")
    } else if available_gib >= MIN_AVAILABLE_MEMORY_GIB {
        CheckResult::pass_with(
            "System Memory",
            format!(
                "{available_gib:.1} GiB available (>= {MIN_AVAILABLE_MEMORY_GIB:.0} GiB required)"
            ),
        )
    } else {
        CheckResult::fail(
            "System Memory",
            format!(
                "{available_gib:.1} GiB available (requires >= {MIN_AVAILABLE_MEMORY_GIB:.0} GiB)"
            ),
        )
    };
    report.record(sink, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::report::BufferSink;
    use crate::hardware::storage::StorageMedium;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn profile(disk_free: u64, available_memory: u64) -> HostProfile {
        HostProfile {
            platform: None,
            physical_cores: 4,
            logical_cores: 8,
            cpu_model: "test".to_string(),
            total_memory: 16 * GIB,
            available_memory,
            storage: StorageMedium::Ssd,
            disk_total: 500 * GIB,
            disk_free,
        }
    }

    #[test]
    fn test_disk_threshold() {
        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();

        check_disk(&profile(11 * GIB, 4 * GIB), &mut report, &mut sink);
        check_disk(&profile(9 * GIB, 4 * GIB), &mut report, &mut sink);

        assert_eq!(report.passed(), 1);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_memory_threshold() {
        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();

        check_memory(&profile(50 * GIB, 2 * GIB), &mut report, &mut sink);
        check_memory(&profile(50 * GIB, GIB), &mut report, &mut sink);

        assert_eq!(report.passed(), 1);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_unqueryable_disk_fails_not_panics() {
        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();

        let mut p = profile(0, 4 * GIB);
        p.disk_total = 0;
        check_disk(&p, &mut report, &mut sink);
        assert!(!report.all_passed());
    }
}
