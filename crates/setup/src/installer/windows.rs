//! Windows branch: Docker Desktop has no scriptable install path worth
//! automating, so this prints the manual steps and only succeeds when
//! docker is already on PATH.

use anyhow::{bail, Result};

use crate::console::Console;
use crate::utils::cmd::command_exists;

pub(super) fn install() -> Result<()> {
    Console::section("Installing Docker on Windows");

    Console::warning("Windows installation requires manual steps:");
    Console::step(1, "Download Docker Desktop from https://www.docker.com/products/docker-desktop/");
    Console::step(2, "Run the installer as Administrator");
    Console::step(3, "Enable WSL2 integration during installation");
    Console::step(4, "Restart the computer after installation");
    Console::step(5, "Start Docker Desktop");

    if command_exists("docker") {
        Console::success("Docker appears to be already installed");
        Ok(())
    } else {
        bail!("install Docker Desktop manually, then re-run `kaspa-setup install`");
    }
}
