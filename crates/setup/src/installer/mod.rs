//! Docker and compose installation, one branch per platform.
//!
//! Each branch is a fixed ordered list of external commands: on the first
//! non-zero exit the branch aborts with the failing step named. Nothing is
//! rolled back and nothing is retried; package managers are left to clean
//! up after themselves.

mod compose;
mod linux;
mod macos;
mod windows;

use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::console::Console;
use crate::error::SetupError;
use crate::platform::Platform;
use crate::utils::cmd::{command_exists, display_command, run_with_timeout, PROBE_TIMEOUT};

/// Entry point for the `install` subcommand.
pub fn run() -> Result<()> {
    Console::section("Docker & Docker Compose Installation");

    let Some(platform) = Platform::detect() else {
        bail!(
            "unsupported operating system `{}`; install Docker manually from \
             https://docs.docker.com/engine/install/",
            std::env::consts::OS
        );
    };
    Console::info("Platform", &platform.to_string());

    if docker_ready() && compose_ready() {
        Console::success("Docker and Docker Compose are already installed");
        return platform.verify();
    }

    platform.install()?;

    // Some Linux repositories ship the engine without the compose plugin;
    // fall back to the standalone binary before declaring victory.
    if matches!(platform, Platform::Linux(_)) && !compose_ready() {
        compose::install_standalone()?;
    }

    Console::section("Final Verification");
    platform.verify()
}

impl Platform {
    /// Run this platform's installation branch.
    pub fn install(&self) -> Result<()> {
        match self {
            Self::Linux(distro) => linux::install(*distro),
            Self::Macos => macos::install(),
            Self::Windows => windows::install(),
        }
    }

    /// Re-probe the installed tools. The engine must answer both a version
    /// query and a daemon-status query; one compose flavor must answer too.
    pub fn verify(&self) -> Result<()> {
        let version = run_with_timeout("docker", &["--version"], PROBE_TIMEOUT)
            .context("querying the Docker version")?;
        if !version.success() {
            bail!("docker --version failed");
        }
        Console::success(&format!("Docker: {}", version.stdout.trim()));

        let info = run_with_timeout("docker", &["info"], PROBE_TIMEOUT)
            .context("querying the Docker daemon")?;
        if !info.success() {
            bail!("the Docker daemon is not running; start it and re-run `kaspa-setup install`");
        }
        Console::success("Docker daemon is running");

        match compose_version() {
            Some(version) => {
                Console::success(&format!("Docker Compose: {version}"));
                Console::success("Docker and Docker Compose are ready to use");
                Ok(())
            }
            None => bail!("Docker Compose not found after installation"),
        }
    }
}

/// Run one installer step to completion, surfacing the stderr tail on
/// failure. Unbounded on purpose: package managers legitimately take
/// minutes.
pub(crate) fn run_step(desc: &str, program: &str, args: &[&str]) -> Result<()> {
    let spinner = Console::spinner(desc);
    let output = Command::new(program).args(args).output();
    spinner.finish_and_clear();

    let output = output.with_context(|| format!("failed to launch `{program}`"))?;
    if !output.status.success() {
        Console::error(desc);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        for line in tail.into_iter().rev() {
            Console::error(line);
        }
        return Err(SetupError::ExternalTool {
            command: display_command(program, args),
            status: output.status,
        }
        .into());
    }

    Console::success(desc);
    Ok(())
}

fn docker_ready() -> bool {
    command_exists("docker")
        && run_with_timeout("docker", &["--version"], PROBE_TIMEOUT)
            .map(|out| out.success())
            .unwrap_or(false)
}

fn compose_ready() -> bool {
    compose_version().is_some()
}

fn compose_version() -> Option<String> {
    if let Ok(out) = run_with_timeout("docker", &["compose", "version"], PROBE_TIMEOUT) {
        if out.success() {
            return Some(format!("plugin: {}", out.stdout.trim()));
        }
    }
    if command_exists("docker-compose") {
        if let Ok(out) = run_with_timeout("docker-compose", &["--version"], PROBE_TIMEOUT) {
            if out.success() {
                return Some(out.stdout.trim().to_string());
            }
        }
    }
    None
}
