//! Storage introspection: free space and medium classification.
//!
//! Medium detection is best-effort per platform. On Linux the block device
//! behind the working volume is resolved through /proc/mounts and judged by
//! its rotational flag (nvme names short-circuit to NVMe). macOS and Windows
//! string-match their management tools' output. Every failure path yields
//! `Unknown` so the scorer never has a reason to error.

use std::path::Path;

/// Medium classification for the data volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMedium {
    #[default]
    Unknown,
    Hdd,
    Ssd,
    NvmeSsd,
}

impl StorageMedium {
    pub fn display(&self) -> &'static str {
        match self {
            Self::NvmeSsd => "NVMe SSD",
            Self::Ssd => "SSD",
            Self::Hdd => "HDD",
            Self::Unknown => "Unknown",
        }
    }
}

/// Free/total bytes on a volume.
#[derive(Debug, Clone, Copy)]
pub struct DiskSpace {
    pub total: u64,
    pub free: u64,
}

/// Native free-space query for the volume holding `path`.
#[cfg(unix)]
pub fn disk_space(path: &Path) -> std::io::Result<DiskSpace> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "path contains NUL"))?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    if unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    let frsize = stat.f_frsize as u64;
    Ok(DiskSpace {
        total: stat.f_blocks as u64 * frsize,
        free: stat.f_bavail as u64 * frsize,
    })
}

#[cfg(not(unix))]
pub fn disk_space(path: &Path) -> std::io::Result<DiskSpace> {
    use sysinfo::Disks;

    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter(|disk| target.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| DiskSpace {
            total: disk.total_space(),
            free: disk.available_space(),
        })
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no disk matches path"))
}

/// Classify the medium backing `path`. Failures collapse to `Unknown`.
pub fn detect_medium(path: &Path) -> StorageMedium {
    match detect_medium_impl(path) {
        Some(medium) => medium,
        None => {
            log::debug!("storage medium detection failed, reporting Unknown");
            StorageMedium::Unknown
        }
    }
}

#[cfg(target_os = "linux")]
fn detect_medium_impl(path: &Path) -> Option<StorageMedium> {
    let device = block_device_for(path)?;
    if device.starts_with("nvme") {
        return Some(StorageMedium::NvmeSsd);
    }
    let rotational =
        std::fs::read_to_string(format!("/sys/block/{device}/queue/rotational")).ok()?;
    match rotational.trim() {
        "1" => Some(StorageMedium::Hdd),
        "0" => Some(StorageMedium::Ssd),
        _ => None,
    }
}

/// Longest mount-point prefix match from /proc/mounts, reduced to the parent
/// block device name.
#[cfg(target_os = "linux")]
fn block_device_for(path: &Path) -> Option<String> {
    use std::path::PathBuf;

    let target = path.canonicalize().ok()?;
    let mounts = std::fs::read_to_string("/proc/mounts").ok()?;

    let mut best: Option<(usize, String)> = None;
    for line in mounts.lines() {
        let mut fields = line.split_whitespace();
        let (Some(device), Some(mount)) = (fields.next(), fields.next()) else {
            continue;
        };
        if !device.starts_with("/dev/") {
            continue;
        }
        let mount = PathBuf::from(mount);
        if !target.starts_with(&mount) {
            continue;
        }
        let len = mount.as_os_str().len();
        if best.as_ref().is_none_or(|(l, _)| len >= *l) {
            best = Some((len, device.trim_start_matches("/dev/").to_string()));
        }
    }

    best.map(|(_, device)| strip_partition(&device))
}

#[cfg(target_os = "macos")]
fn detect_medium_impl(_path: &Path) -> Option<StorageMedium> {
    use std::time::Duration;

    use crate::utils::cmd::run_with_timeout;

    let out = run_with_timeout("diskutil", &["info", "/"], Duration::from_secs(5)).ok()?;
    if !out.success() {
        return None;
    }
    match classify_diskutil(&out.stdout) {
        StorageMedium::Unknown => None,
        medium => Some(medium),
    }
}

#[cfg(target_os = "windows")]
fn detect_medium_impl(_path: &Path) -> Option<StorageMedium> {
    use std::time::Duration;

    use crate::utils::cmd::run_with_timeout;

    let out = run_with_timeout(
        "powershell",
        &[
            "-NoProfile",
            "-Command",
            "Get-PhysicalDisk | Select-Object -ExpandProperty MediaType",
        ],
        Duration::from_secs(5),
    )
    .ok()?;
    if !out.success() {
        return None;
    }
    classify_media_type(&out.stdout)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn detect_medium_impl(_path: &Path) -> Option<StorageMedium> {
    None
}

/// "nvme0n1p2" -> "nvme0n1", "mmcblk0p1" -> "mmcblk0", "sda3" -> "sda".
#[cfg(any(test, target_os = "linux"))]
fn strip_partition(device: &str) -> String {
    if device.starts_with("nvme") || device.starts_with("mmcblk") {
        match device.rfind('p') {
            Some(idx)
                if idx + 1 < device.len()
                    && device[idx + 1..].chars().all(|c| c.is_ascii_digit()) =>
            {
                device[..idx].to_string()
            }
            _ => device.to_string(),
        }
    } else {
        device
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .to_string()
    }
}

#[cfg(any(test, target_os = "macos"))]
fn classify_diskutil(output: &str) -> StorageMedium {
    let lower = output.to_lowercase();
    if lower.contains("nvme") {
        StorageMedium::NvmeSsd
    } else if lower.contains("solid state: yes") {
        StorageMedium::Ssd
    } else if lower.contains("solid state: no") {
        StorageMedium::Hdd
    } else {
        StorageMedium::Unknown
    }
}

#[cfg(any(test, target_os = "windows"))]
fn classify_media_type(output: &str) -> Option<StorageMedium> {
    let lower = output.to_lowercase();
    if lower.contains("ssd") {
        Some(StorageMedium::Ssd)
    } else if lower.contains("hdd") {
        Some(StorageMedium::Hdd)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_disk_space_on_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let space = disk_space(dir.path()).unwrap();
        assert!(space.total > 0);
        assert!(space.free <= space.total);
    }

    #[test]
    fn test_detect_medium_never_panics() {
        // Whatever the host looks like, classification must settle on a value.
        let _ = detect_medium(Path::new("."));
    }

    #[test]
    fn test_strip_partition() {
        assert_eq!(strip_partition("sda3"), "sda");
        assert_eq!(strip_partition("sda"), "sda");
        assert_eq!(strip_partition("nvme0n1p2"), "nvme0n1");
        assert_eq!(strip_partition("nvme0n1"), "nvme0n1");
        assert_eq!(strip_partition("mmcblk0p1"), "mmcblk0");
    }

    #[test]
    fn test_classify_diskutil() {
        assert_eq!(
            classify_diskutil("Protocol: NVMe\nSolid State: Yes\n"),
            StorageMedium::NvmeSsd
        );
        assert_eq!(
            classify_diskutil("Protocol: SATA\nSolid State: Yes\n"),
            StorageMedium::Ssd
        );
        assert_eq!(
            classify_diskutil("Protocol: SATA\nSolid State: No\n"),
            StorageMedium::Hdd
        );
        assert_eq!(classify_diskutil("garbage"), StorageMedium::Unknown);
    }

    #[test]
    fn test_classify_media_type() {
        assert_eq!(classify_media_type("SSD\nSSD\n"), Some(StorageMedium::Ssd));
        assert_eq!(classify_media_type("HDD\n"), Some(StorageMedium::Hdd));
        assert_eq!(classify_media_type("Unspecified\n"), None);
    }
}
