//! Host platform identification.
//!
//! The installer and checker both branch on the closed set below; anything
//! outside it means "ask the operator to proceed manually", never a panic.

use std::fmt;
use std::path::Path;

/// Linux distribution family, best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinuxDistro {
    Ubuntu,
    Debian,
    Centos,
    Rhel,
    Fedora,
    Arch,
    Unknown,
}

impl LinuxDistro {
    /// Map an os-release `ID=` value.
    pub fn from_id(id: &str) -> Self {
        match id {
            "ubuntu" => Self::Ubuntu,
            "debian" => Self::Debian,
            "centos" => Self::Centos,
            "rhel" => Self::Rhel,
            "fedora" => Self::Fedora,
            "arch" | "archarm" => Self::Arch,
            _ => Self::Unknown,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Centos => "centos",
            Self::Rhel => "rhel",
            Self::Fedora => "fedora",
            Self::Arch => "arch",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LinuxDistro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The platforms this toolkit knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux(LinuxDistro),
    Macos,
    Windows,
}

impl Platform {
    /// Identify the running host. `None` means the OS is outside the
    /// supported set; callers report it and let the operator proceed
    /// manually.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::Linux(detect_linux_distro()))
        } else if cfg!(target_os = "macos") {
            Some(Self::Macos)
        } else if cfg!(target_os = "windows") {
            Some(Self::Windows)
        } else {
            None
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            Self::Linux(_) => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux(distro) => write!(f, "Linux ({distro})"),
            Self::Macos => f.write_str("macOS"),
            Self::Windows => f.write_str("Windows"),
        }
    }
}

/// os-release `ID=` first, marker files second.
fn detect_linux_distro() -> LinuxDistro {
    if let Ok(contents) = std::fs::read_to_string("/etc/os-release") {
        if let Some(distro) = parse_os_release(&contents) {
            if distro != LinuxDistro::Unknown {
                return distro;
            }
        }
    }
    log::debug!("os-release gave no usable ID, falling back to marker files");
    distro_from_markers(Path::new("/etc"))
}

/// Extract the `ID=` field from os-release contents. `None` when the field
/// is absent entirely.
pub fn parse_os_release(contents: &str) -> Option<LinuxDistro> {
    contents.lines().find_map(|line| {
        line.strip_prefix("ID=")
            .map(|value| LinuxDistro::from_id(value.trim().trim_matches('"')))
    })
}

/// Marker-file fallback for hosts without a parsable os-release.
pub fn distro_from_markers(etc: &Path) -> LinuxDistro {
    if etc.join("debian_version").exists() {
        LinuxDistro::Debian
    } else if etc.join("redhat-release").exists() {
        LinuxDistro::Rhel
    } else if etc.join("arch-release").exists() {
        LinuxDistro::Arch
    } else {
        LinuxDistro::Unknown
    }
}

/// Debian packaging name for the build architecture. Unrecognized machines
/// pass through unchanged; apt reports them better than we could.
pub fn dpkg_arch() -> String {
    dpkg_arch_for(std::env::consts::ARCH)
}

pub fn dpkg_arch_for(machine: &str) -> String {
    match machine {
        "x86_64" => "amd64".to_string(),
        "aarch64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

/// Architecture suffix of compose release artifacts, when one exists.
pub fn compose_arch() -> Option<&'static str> {
    compose_arch_for(std::env::consts::ARCH)
}

pub fn compose_arch_for(machine: &str) -> Option<&'static str> {
    match machine {
        "x86_64" => Some("x86_64"),
        "aarch64" => Some("aarch64"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_release_ubuntu() {
        let contents = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"22.04\"\n";
        assert_eq!(parse_os_release(contents), Some(LinuxDistro::Ubuntu));
    }

    #[test]
    fn test_parse_os_release_quoted_id() {
        let contents = "ID=\"centos\"\nVERSION_ID=\"8\"\n";
        assert_eq!(parse_os_release(contents), Some(LinuxDistro::Centos));
    }

    #[test]
    fn test_parse_os_release_unrecognized_id() {
        let contents = "ID=gentoo\n";
        assert_eq!(parse_os_release(contents), Some(LinuxDistro::Unknown));
    }

    #[test]
    fn test_parse_os_release_missing_id() {
        assert_eq!(parse_os_release("NAME=Something\n"), None);
    }

    #[test]
    fn test_distro_from_markers() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(distro_from_markers(dir.path()), LinuxDistro::Unknown);

        std::fs::write(dir.path().join("arch-release"), "").unwrap();
        assert_eq!(distro_from_markers(dir.path()), LinuxDistro::Arch);

        std::fs::write(dir.path().join("redhat-release"), "").unwrap();
        assert_eq!(distro_from_markers(dir.path()), LinuxDistro::Rhel);

        // Debian marker wins over the others, matching the probe order.
        std::fs::write(dir.path().join("debian_version"), "12").unwrap();
        assert_eq!(distro_from_markers(dir.path()), LinuxDistro::Debian);
    }

    #[test]
    fn test_arch_translation() {
        assert_eq!(dpkg_arch_for("x86_64"), "amd64");
        assert_eq!(dpkg_arch_for("aarch64"), "arm64");
        assert_eq!(dpkg_arch_for("riscv64"), "riscv64");
        assert_eq!(compose_arch_for("x86_64"), Some("x86_64"));
        assert_eq!(compose_arch_for("aarch64"), Some("aarch64"));
        assert_eq!(compose_arch_for("riscv64"), None);
    }
}
