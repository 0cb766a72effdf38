//! The flat `.env` record consumed by the docker-compose definition.
//!
//! One file, written whole at the end of a wizard session, never updated in
//! place. The compose file itself is a collaborator boundary: this crate
//! only ever checks that it exists.

use std::fs;
use std::io;
use std::path::Path;

/// Ports the node binds. Single source of truth for both the pre-flight
/// checker and the wizard defaults.
pub const REQUIRED_PORTS: [u16; 4] = [16111, 16110, 17110, 18110];

pub const ENV_FILE: &str = ".env";
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Fixed service identity; the compose definition keys off it.
const SERVICE_NAME: &str = "research-pad";

/// Bootstrap peer list, fixed.
const STATIC_PEERS: &str = "51.79.24.82:16111,162.55.100.124:16111";

/// Everything the wizard collects, one field per `.env` key. All values are
/// kept as the strings the operator typed (or accepted); validation happens
/// at prompt time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEnvConfig {
    pub container_name: String,
    pub image_name: String,
    pub image_tag: String,
    pub p2p_port: String,
    pub grpc_port: String,
    pub wrpc_borsh_port: String,
    pub wrpc_json_port: String,
    pub external_ip: String,
    pub data_volume_path: String,
    pub app_data_path: String,
    pub dns_primary: String,
    pub dns_secondary: String,
    pub user_id: String,
    pub group_id: String,
    pub ulimit_soft: String,
    pub ulimit_hard: String,
    pub health_check_interval: String,
    pub health_check_timeout: String,
    pub health_check_retries: String,
    pub health_check_start_period: String,
}

impl Default for NodeEnvConfig {
    fn default() -> Self {
        Self {
            container_name: "kaspa-node".to_string(),
            image_name: "local/research-pad".to_string(),
            image_tag: "latest".to_string(),
            p2p_port: REQUIRED_PORTS[0].to_string(),
            grpc_port: REQUIRED_PORTS[1].to_string(),
            wrpc_borsh_port: REQUIRED_PORTS[2].to_string(),
            wrpc_json_port: REQUIRED_PORTS[3].to_string(),
            external_ip: "0.0.0.0".to_string(),
            data_volume_path: "./kaspa-data".to_string(),
            app_data_path: "/app/data".to_string(),
            dns_primary: "8.8.8.8".to_string(),
            dns_secondary: "1.1.1.1".to_string(),
            user_id: "0".to_string(),
            group_id: "0".to_string(),
            ulimit_soft: "1048576".to_string(),
            ulimit_hard: "1048576".to_string(),
            health_check_interval: "30s".to_string(),
            health_check_timeout: "5s".to_string(),
            health_check_retries: "20".to_string(),
            health_check_start_period: "60s".to_string(),
        }
    }
}

impl NodeEnvConfig {
    /// The four network ports, in template order.
    pub fn ports(&self) -> [&str; 4] {
        [
            &self.p2p_port,
            &self.grpc_port,
            &self.wrpc_borsh_port,
            &self.wrpc_json_port,
        ]
    }

    /// Render the `.env` template.
    pub fn render(&self) -> String {
        format!(
            "# Kaspa Node Configuration\n\
             # Generated by kaspa-setup\n\
             \n\
             # Service Configuration\n\
             SERVICE_NAME={service_name}\n\
             CONTAINER_NAME={container_name}\n\
             IMAGE_NAME={image_name}\n\
             IMAGE_TAG={image_tag}\n\
             \n\
             # Network Configuration\n\
             P2P_PORT={p2p_port}\n\
             GRPC_PORT={grpc_port}\n\
             WRPC_BORSH_PORT={wrpc_borsh_port}\n\
             WRPC_JSON_PORT={wrpc_json_port}\n\
             EXTERNAL_IP={external_ip}\n\
             \n\
             # Data Configuration\n\
             DATA_VOLUME_PATH={data_volume_path}\n\
             APP_DATA_PATH={app_data_path}\n\
             \n\
             # DNS Configuration\n\
             DNS_PRIMARY={dns_primary}\n\
             DNS_SECONDARY={dns_secondary}\n\
             \n\
             # User Configuration\n\
             USER_ID={user_id}\n\
             GROUP_ID={group_id}\n\
             \n\
             # Resource Limits\n\
             ULIMIT_SOFT={ulimit_soft}\n\
             ULIMIT_HARD={ulimit_hard}\n\
             \n\
             # Health Check Configuration\n\
             HEALTH_CHECK_INTERVAL={health_check_interval}\n\
             HEALTH_CHECK_TIMEOUT={health_check_timeout}\n\
             HEALTH_CHECK_RETRIES={health_check_retries}\n\
             HEALTH_CHECK_START_PERIOD={health_check_start_period}\n\
             \n\
             # Peer Configuration (comma-separated list)\n\
             PEERS={peers}\n",
            service_name = SERVICE_NAME,
            container_name = self.container_name,
            image_name = self.image_name,
            image_tag = self.image_tag,
            p2p_port = self.p2p_port,
            grpc_port = self.grpc_port,
            wrpc_borsh_port = self.wrpc_borsh_port,
            wrpc_json_port = self.wrpc_json_port,
            external_ip = self.external_ip,
            data_volume_path = self.data_volume_path,
            app_data_path = self.app_data_path,
            dns_primary = self.dns_primary,
            dns_secondary = self.dns_secondary,
            user_id = self.user_id,
            group_id = self.group_id,
            ulimit_soft = self.ulimit_soft,
            ulimit_hard = self.ulimit_hard,
            health_check_interval = self.health_check_interval,
            health_check_timeout = self.health_check_timeout,
            health_check_retries = self.health_check_retries,
            health_check_start_period = self.health_check_start_period,
            peers = STATIC_PEERS,
        )
    }
}

/// Write the rendered config to `path`.
///
/// Returns `Ok(false)` without touching anything when the file exists and
/// `overwrite` is not set; the caller owns the confirmation prompt.
pub fn write_env_file(path: &Path, config: &NodeEnvConfig, overwrite: bool) -> io::Result<bool> {
    if path.exists() && !overwrite {
        return Ok(false);
    }
    fs::write(path, config.render())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render_matches_template() {
        let rendered = NodeEnvConfig::default().render();
        let expected = "\
# Kaspa Node Configuration
# Generated by kaspa-setup

# Service Configuration
SERVICE_NAME=research-pad
CONTAINER_NAME=kaspa-node
IMAGE_NAME=local/research-pad
IMAGE_TAG=latest

# Network Configuration
P2P_PORT=16111
GRPC_PORT=16110
WRPC_BORSH_PORT=17110
WRPC_JSON_PORT=18110
EXTERNAL_IP=0.0.0.0

# Data Configuration
DATA_VOLUME_PATH=./kaspa-data
APP_DATA_PATH=/app/data

# DNS Configuration
DNS_PRIMARY=8.8.8.8
DNS_SECONDARY=1.1.1.1

# User Configuration
USER_ID=0
GROUP_ID=0

# Resource Limits
ULIMIT_SOFT=1048576
ULIMIT_HARD=1048576

# Health Check Configuration
HEALTH_CHECK_INTERVAL=30s
HEALTH_CHECK_TIMEOUT=5s
HEALTH_CHECK_RETRIES=20
HEALTH_CHECK_START_PERIOD=60s

# Peer Configuration (comma-separated list)
PEERS=51.79.24.82:16111,162.55.100.124:16111
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_defaults_track_required_ports() {
        let config = NodeEnvConfig::default();
        let defaults: Vec<String> = REQUIRED_PORTS.iter().map(|p| p.to_string()).collect();
        let ports: Vec<String> = config.ports().iter().map(|p| p.to_string()).collect();
        assert_eq!(ports, defaults);
    }

    #[test]
    fn test_write_refuses_existing_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ORIGINAL=1\n").unwrap();

        let written = write_env_file(&path, &NodeEnvConfig::default(), false).unwrap();
        assert!(!written);
        assert_eq!(fs::read(&path).unwrap(), b"ORIGINAL=1\n");
    }

    #[test]
    fn test_write_overwrites_when_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ORIGINAL=1\n").unwrap();

        let written = write_env_file(&path, &NodeEnvConfig::default(), true).unwrap();
        assert!(written);
        assert_eq!(fs::read_to_string(&path).unwrap(), NodeEnvConfig::default().render());
    }

    #[test]
    fn test_write_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        let written = write_env_file(&path, &NodeEnvConfig::default(), false).unwrap();
        assert!(written);
        assert!(path.exists());
    }
}
