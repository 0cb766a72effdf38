//! Blocking subprocess helpers.
//!
//! Probes (version queries, daemon status) run under a fixed bound so an
//! unresponsive tool cannot hang the whole run. Installer steps run
//! unbounded; package managers legitimately take minutes.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::SetupError;

/// Bound for short probe commands (`docker --version`, `docker info`, ...).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CmdOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run a probe command, killing it once `timeout` elapses.
///
/// Output is read after exit; probe output is far below the pipe buffer
/// size, so this cannot deadlock.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CmdOutput, SetupError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SetupError::ToolTimeout {
                    command: display_command(program, args),
                    timeout,
                });
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let mut stdout = String::new();
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout)?;
    }
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr)?;
    }

    Ok(CmdOutput {
        status,
        stdout,
        stderr,
    })
}

/// Locate `cmd` on PATH.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

pub fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        assert!(command_exists("ls"));
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }

    #[test]
    #[cfg(unix)]
    fn test_run_captures_output() {
        let out = run_with_timeout("echo", &["hello"], PROBE_TIMEOUT).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_kills_on_timeout() {
        let err = run_with_timeout("sleep", &["30"], Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, SetupError::ToolTimeout { .. }));
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command("docker", &[]), "docker");
        assert_eq!(display_command("docker", &["info"]), "docker info");
    }
}
