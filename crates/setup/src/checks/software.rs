//! Container-runtime and working-directory probes.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::report::{CheckReport, CheckResult, StatusSink};
use crate::config::COMPOSE_FILE;
use crate::utils::cmd::{command_exists, run_with_timeout, PROBE_TIMEOUT};

/// Oldest engine release shipping the compose plugin the installer relies on.
pub const MIN_DOCKER_VERSION: (u32, u32) = (20, 10);

/// Files the compose setup expects next to the operator. Presence only;
/// their content is never interpreted here.
pub const REQUIRED_FILES: &[&str] = &[COMPOSE_FILE, "Dockerfile", ".env.example"];

/// Engine ladder: PATH lookup, version query, daemon status. Each rung
/// records its own result so a missing binary still yields a full table.
pub fn check_docker(report: &mut CheckReport, sink: &mut dyn StatusSink) {
    if !command_exists("docker") {
        let detail = "docker not found in PATH";
        report.record(sink, CheckResult::fail("Docker Installation", detail));
        report.record(sink, CheckResult::fail("Docker Version", detail));
        report.record(sink, CheckResult::fail("Docker Daemon", detail));
        return;
    }

    match run_with_timeout("docker", &["--version"], PROBE_TIMEOUT) {
        Ok(out) if out.success() => {
            let version_line = out.stdout.trim().to_string();
            report.record(
                sink,
                CheckResult::pass_with("Docker Installation", version_line.clone()),
            );
            report.record(sink, version_check_result(&version_line));
        }
        Ok(_) => {
            report.record(
                sink,
                CheckResult::fail("Docker Installation", "docker --version failed"),
            );
            report.record(
                sink,
                CheckResult::fail("Docker Version", "could not determine version"),
            );
        }
        Err(e) => {
            report.record(
                sink,
                CheckResult::fail("Docker Installation", e.to_string()),
            );
            report.record(
                sink,
                CheckResult::fail("Docker Version", "could not determine version"),
            );
        }
    }

    match run_with_timeout("docker", &["info"], PROBE_TIMEOUT) {
        Ok(out) if out.success() => {
            report.record(
                sink,
                CheckResult::pass_with("Docker Daemon", "daemon is running"),
            );
        }
        Ok(_) => {
            report.record(
                sink,
                CheckResult::fail("Docker Daemon", "daemon is not running"),
            );
        }
        Err(e) => {
            report.record(sink, CheckResult::fail("Docker Daemon", e.to_string()));
        }
    }
}

/// Compose plugin first, standalone binary second.
pub fn check_compose(report: &mut CheckReport, sink: &mut dyn StatusSink) {
    if let Ok(out) = run_with_timeout("docker", &["compose", "version"], PROBE_TIMEOUT) {
        if out.success() {
            report.record(
                sink,
                CheckResult::pass_with(
                    "Docker Compose",
                    format!("plugin: {}", out.stdout.trim()),
                ),
            );
            return;
        }
    }

    if command_exists("docker-compose") {
        if let Ok(out) = run_with_timeout("docker-compose", &["--version"], PROBE_TIMEOUT) {
            if out.success() {
                report.record(
                    sink,
                    CheckResult::pass_with("Docker Compose", out.stdout.trim()),
                );
                return;
            }
        }
    }

    report.record(
        sink,
        CheckResult::fail(
            "Docker Compose",
            "neither the compose plugin nor docker-compose found",
        ),
    );
}

pub fn check_required_files(dir: &Path, report: &mut CheckReport, sink: &mut dyn StatusSink) {
    for file in REQUIRED_FILES {
        let result = if dir.join(file).exists() {
            CheckResult::pass(format!("File: {file}"))
        } else {
            CheckResult::fail(format!("File: {file}"), "required file missing")
        };
        report.record(sink, result);
    }
}

fn version_check_result(version_line: &str) -> CheckResult {
    let (min_major, min_minor) = MIN_DOCKER_VERSION;
    match parse_docker_version(version_line) {
        Some((major, minor)) if (major, minor) >= MIN_DOCKER_VERSION => CheckResult::pass_with(
            "Docker Version",
            format!("{major}.{minor} >= {min_major}.{min_minor}"),
        ),
        Some((major, minor)) => CheckResult::fail(
            "Docker Version",
            format!("{major}.{minor} is older than the required {min_major}.{min_minor}"),
        ),
        None => CheckResult::fail("Docker Version", "unparsable version output"),
    }
}

/// Extract (major, minor) from `docker --version` output, e.g.
/// "Docker version 27.1.1, build 6312585".
pub fn parse_docker_version(line: &str) -> Option<(u32, u32)> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)").expect("static pattern"));

    let caps = re.captures(line)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::report::BufferSink;

    #[test]
    fn test_parse_docker_version() {
        assert_eq!(
            parse_docker_version("Docker version 27.1.1, build 6312585"),
            Some((27, 1))
        );
        assert_eq!(
            parse_docker_version("Docker version 19.03.8, build afacb8b"),
            Some((19, 3))
        );
        assert_eq!(parse_docker_version("no digits here"), None);
    }

    #[test]
    fn test_version_check_result() {
        assert!(version_check_result("Docker version 27.1.1, build x").passed);
        assert!(version_check_result("Docker version 20.10.0, build x").passed);
        assert!(!version_check_result("Docker version 19.03.8, build x").passed);
        assert!(!version_check_result("garbage").passed);
    }

    #[test]
    fn test_required_files_fail_independently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        std::fs::write(dir.path().join(".env.example"), "").unwrap();

        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();
        check_required_files(dir.path(), &mut report, &mut sink);

        // One missing file fails its own check; the other two still ran.
        assert_eq!(report.total(), REQUIRED_FILES.len());
        assert_eq!(report.passed(), 2);
        assert!(report.get("File: docker-compose.yml").unwrap().passed);
        assert!(!report.get("File: Dockerfile").unwrap().passed);
        assert!(report.get("File: .env.example").unwrap().passed);
    }
}
