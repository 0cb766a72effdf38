//! Linux installation branches, one per distribution family.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use super::run_step;
use crate::console::Console;
use crate::platform::{dpkg_arch, LinuxDistro};
use crate::utils::cmd::{run_with_timeout, PROBE_TIMEOUT};

const DOCKER_GPG_URL: &str = "https://download.docker.com/linux/ubuntu/gpg";
const KEYRING_PATH: &str = "/usr/share/keyrings/docker-archive-keyring.gpg";
const CE_REPO_URL: &str = "https://download.docker.com/linux/centos/docker-ce.repo";

pub(super) fn install(distro: LinuxDistro) -> Result<()> {
    Console::section(&format!("Installing Docker on {distro}"));
    match distro {
        LinuxDistro::Ubuntu | LinuxDistro::Debian => install_debian_family(),
        LinuxDistro::Centos | LinuxDistro::Rhel | LinuxDistro::Fedora => install_redhat_family(),
        LinuxDistro::Arch => install_arch(),
        LinuxDistro::Unknown => bail!(
            "unrecognized Linux distribution; install Docker manually from \
             https://docs.docker.com/engine/install/"
        ),
    }
}

fn install_debian_family() -> Result<()> {
    run_step("Updating package index", "sudo", &["apt-get", "update"])?;
    run_step(
        "Installing prerequisites",
        "sudo",
        &[
            "apt-get",
            "install",
            "-y",
            "apt-transport-https",
            "ca-certificates",
            "curl",
            "gnupg",
            "lsb-release",
        ],
    )?;
    import_signing_key()?;
    register_apt_repository()?;
    run_step("Refreshing package index", "sudo", &["apt-get", "update"])?;
    run_step(
        "Installing Docker Engine",
        "sudo",
        &[
            "apt-get",
            "install",
            "-y",
            "docker-ce",
            "docker-ce-cli",
            "containerd.io",
            "docker-compose-plugin",
        ],
    )?;
    grant_docker_group()?;
    Console::success("Docker installed");
    Ok(())
}

fn install_redhat_family() -> Result<()> {
    run_step("Installing yum-utils", "sudo", &["yum", "install", "-y", "yum-utils"])?;
    run_step(
        "Registering the Docker repository",
        "sudo",
        &["yum-config-manager", "--add-repo", CE_REPO_URL],
    )?;
    run_step(
        "Installing Docker Engine",
        "sudo",
        &[
            "yum",
            "install",
            "-y",
            "docker-ce",
            "docker-ce-cli",
            "containerd.io",
            "docker-compose-plugin",
        ],
    )?;
    run_step("Starting the Docker service", "sudo", &["systemctl", "start", "docker"])?;
    run_step("Enabling the Docker service", "sudo", &["systemctl", "enable", "docker"])?;
    grant_docker_group()?;
    Console::success("Docker installed");
    Ok(())
}

fn install_arch() -> Result<()> {
    run_step(
        "Installing docker and docker-compose",
        "sudo",
        &["pacman", "-S", "--noconfirm", "docker", "docker-compose"],
    )?;
    run_step("Starting the Docker service", "sudo", &["systemctl", "start", "docker"])?;
    run_step("Enabling the Docker service", "sudo", &["systemctl", "enable", "docker"])?;
    grant_docker_group()?;
    Console::success("Docker installed");
    Ok(())
}

/// Download the vendor signing key over HTTPS, stage it in a temp file, and
/// dearmor it into the keyring.
fn import_signing_key() -> Result<()> {
    Console::progress("Importing Docker's GPG key");
    let key = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?
        .get(DOCKER_GPG_URL)
        .send()
        .context("downloading the Docker GPG key")?
        .error_for_status()?
        .bytes()?;

    let mut staged = tempfile::NamedTempFile::new()?;
    staged.write_all(&key)?;
    let staged_path = staged.path().to_string_lossy().into_owned();

    run_step(
        "Installing the signing key",
        "sudo",
        &["gpg", "--dearmor", "--yes", "-o", KEYRING_PATH, &staged_path],
    )
}

fn register_apt_repository() -> Result<()> {
    let codename = run_with_timeout("lsb_release", &["-cs"], PROBE_TIMEOUT)
        .ok()
        .filter(|out| out.success())
        .map(|out| out.stdout.trim().to_string())
        .context("could not determine the distribution codename")?;

    let arch = dpkg_arch();
    let repo_line = format!(
        "echo \"deb [arch={arch} signed-by={KEYRING_PATH}] \
         https://download.docker.com/linux/ubuntu {codename} stable\" \
         > /etc/apt/sources.list.d/docker.list"
    );
    run_step(
        "Registering the Docker repository",
        "sudo",
        &["sh", "-c", &repo_line],
    )
}

fn grant_docker_group() -> Result<()> {
    let user = std::env::var("USER").unwrap_or_else(|_| "root".to_string());
    run_step(
        "Adding the user to the docker group",
        "sudo",
        &["usermod", "-aG", "docker", &user],
    )
}
