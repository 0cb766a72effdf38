//! macOS branch: Homebrew bootstrap (when needed) plus the Docker Desktop
//! cask. The daemon only exists once the operator starts Docker Desktop,
//! so verification is expected to nag about that.

use anyhow::Result;

use super::run_step;
use crate::console::Console;
use crate::utils::cmd::command_exists;

const HOMEBREW_BOOTSTRAP: &str =
    r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

pub(super) fn install() -> Result<()> {
    Console::section("Installing Docker on macOS");

    if command_exists("brew") {
        Console::success("Homebrew is already installed");
    } else {
        run_step("Bootstrapping Homebrew", "/bin/bash", &["-c", HOMEBREW_BOOTSTRAP])?;
    }

    run_step("Installing Docker Desktop", "brew", &["install", "--cask", "docker"])?;
    Console::warning("Start Docker Desktop from the Applications folder before continuing");
    Ok(())
}
