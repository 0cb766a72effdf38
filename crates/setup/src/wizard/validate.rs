//! Field validators for the wizard prompts. Returning `Err` makes dialoguer
//! re-prompt; this loop is the only retry behavior in the whole toolkit.

use std::net::Ipv4Addr;
use std::path::Path;

/// Integer in 1..=65535.
pub fn port(input: &str) -> Result<(), String> {
    match input.trim().parse::<u32>() {
        Ok(p) if (1..=65535).contains(&p) => Ok(()),
        Ok(_) => Err("port must be between 1 and 65535".to_string()),
        Err(_) => Err("please enter a valid port number".to_string()),
    }
}

/// Dotted-quad IPv4 address.
pub fn ip(input: &str) -> Result<(), String> {
    input
        .trim()
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| "please enter a valid IPv4 address".to_string())
}

/// Host path whose parent directory already exists. Bare relative names
/// resolve against the working directory and always pass.
pub fn host_path(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("path cannot be empty".to_string());
    }

    match Path::new(trimmed).parent() {
        None => Ok(()),
        Some(parent) if parent.as_os_str().is_empty() => Ok(()),
        Some(parent) if parent.exists() => Ok(()),
        Some(parent) => Err(format!(
            "parent directory does not exist: {}",
            parent.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_accepts_range() {
        assert!(port("1").is_ok());
        assert!(port("16111").is_ok());
        assert!(port("65535").is_ok());
    }

    #[test]
    fn test_port_rejects_out_of_range_and_garbage() {
        assert!(port("0").is_err());
        assert!(port("70000").is_err());
        assert!(port("-1").is_err());
        assert!(port("not-a-port").is_err());
    }

    #[test]
    fn test_ip_accepts_dotted_quad() {
        assert!(ip("0.0.0.0").is_ok());
        assert!(ip("192.168.1.10").is_ok());
    }

    #[test]
    fn test_ip_rejects_malformed() {
        assert!(ip("999.1.1.1").is_err());
        assert!(ip("10.0.0").is_err());
        assert!(ip("example.com").is_err());
    }

    #[test]
    fn test_host_path() {
        assert!(host_path("./kaspa-data").is_ok());
        assert!(host_path("kaspa-data").is_ok());
        assert!(host_path("/").is_ok());
        assert!(host_path("").is_err());
        assert!(host_path("/definitely/not/a/real/parent/data").is_err());

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        assert!(host_path(&nested.to_string_lossy()).is_ok());
    }
}
