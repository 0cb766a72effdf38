//! Standalone docker-compose fallback for distributions whose repositories
//! ship the engine without the compose plugin.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::console::Console;
use crate::platform::compose_arch;

const RELEASES_LATEST_URL: &str =
    "https://api.github.com/repos/docker/compose/releases/latest";
const FALLBACK_VERSION: &str = "v2.24.0";
const INSTALL_PATH: &str = "/usr/local/bin/docker-compose";

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

pub(super) fn install_standalone() -> Result<()> {
    Console::section("Installing Docker Compose (standalone)");

    let Some(arch) = compose_arch() else {
        bail!(
            "no standalone compose build for architecture `{}`",
            std::env::consts::ARCH
        );
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("kaspa-setup/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .build()?;

    let version = latest_version(&client).unwrap_or_else(|| {
        log::debug!("release lookup failed, using the pinned compose version");
        FALLBACK_VERSION.to_string()
    });

    Console::progress(&format!("Downloading Docker Compose {version}"));
    let body = client
        .get(artifact_url(&version, arch))
        .send()
        .context("downloading docker-compose")?
        .error_for_status()?
        .bytes()?;

    match install_binary(&body) {
        Ok(()) => {
            Console::success(&format!("Docker Compose installed to {INSTALL_PATH}"));
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            bail!("permission denied writing {INSTALL_PATH}; re-run with sudo or install compose manually")
        }
        Err(e) => Err(e).context("installing docker-compose"),
    }
}

/// Best-effort latest tag; any failure falls back to the pinned version.
fn latest_version(client: &reqwest::blocking::Client) -> Option<String> {
    let body = client
        .get(RELEASES_LATEST_URL)
        .timeout(Duration::from_secs(5))
        .send()
        .ok()?
        .error_for_status()
        .ok()?
        .text()
        .ok()?;
    let release: Release = serde_json::from_str(&body).ok()?;
    Some(release.tag_name)
}

fn artifact_url(version: &str, arch: &str) -> String {
    format!(
        "https://github.com/docker/compose/releases/download/{version}/docker-compose-linux-{arch}"
    )
}

#[cfg(unix)]
fn install_binary(bytes: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(INSTALL_PATH, bytes)?;
    std::fs::set_permissions(INSTALL_PATH, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn install_binary(_bytes: &[u8]) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "the standalone compose install only applies to Linux hosts",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_url() {
        assert_eq!(
            artifact_url("v2.24.0", "x86_64"),
            "https://github.com/docker/compose/releases/download/v2.24.0/docker-compose-linux-x86_64"
        );
        assert_eq!(
            artifact_url("v2.24.0", "aarch64"),
            "https://github.com/docker/compose/releases/download/v2.24.0/docker-compose-linux-aarch64"
        );
    }
}
