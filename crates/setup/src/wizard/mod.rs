//! Interactive configuration wizard.
//!
//! One prompt group per configuration domain, each field offering a default
//! accepted on empty input. The collected answers become the `.env` file;
//! an existing file is only replaced after an explicit confirmation.

mod validate;

use std::net::{IpAddr, UdpSocket};
use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::checks::network::port_available;
use crate::config::{self, NodeEnvConfig, COMPOSE_FILE, ENV_FILE};
use crate::console::Console;
use crate::error::SetupError;

/// Entry point for the `wizard` subcommand.
pub fn run() -> Result<()> {
    Console::section("Kaspa Node Setup Wizard");
    println!(
        "{}",
        style("Press Enter to accept the default shown for each prompt.").yellow()
    );

    if !Path::new(COMPOSE_FILE).exists() {
        bail!("{COMPOSE_FILE} not found; run the wizard from the node directory");
    }

    let theme = ColorfulTheme::default();
    let mut config = NodeEnvConfig::default();

    network_group(&theme, &mut config)?;
    container_group(&theme, &mut config)?;
    data_group(&theme, &mut config)?;
    system_group(&theme, &mut config)?;
    resource_group(&theme, &mut config)?;
    health_group(&theme, &mut config)?;

    // Declining a port conflict re-enters the network group only; the rest
    // of the answers stay as given.
    loop {
        let occupied = occupied_ports(&config);
        if occupied.is_empty() {
            break;
        }

        Console::warning(&format!("Ports already in use: {}", occupied.join(", ")));
        println!(
            "{}",
            style("Change the ports or stop whatever is using them.").yellow()
        );
        let proceed = Confirm::with_theme(&theme)
            .with_prompt("Continue anyway?")
            .default(false)
            .interact()?;
        if proceed {
            break;
        }
        network_group(&theme, &mut config)?;
    }

    print_summary(&config);

    let save = Confirm::with_theme(&theme)
        .with_prompt("Save this configuration?")
        .default(true)
        .interact()?;
    if !save {
        Console::warning("Configuration cancelled");
        return Err(SetupError::Cancelled.into());
    }

    let env_path = Path::new(ENV_FILE);
    let overwrite = if env_path.exists() {
        Confirm::with_theme(&theme)
            .with_prompt(format!("{ENV_FILE} already exists. Overwrite it?"))
            .default(false)
            .interact()?
    } else {
        true
    };

    if !config::write_env_file(env_path, &config, overwrite).context("saving configuration")? {
        Console::warning("Configuration not saved");
        return Err(SetupError::Cancelled.into());
    }
    Console::success(&format!("Configuration saved to {ENV_FILE}"));

    print_next_steps(&config);
    Ok(())
}

fn prompt(theme: &ColorfulTheme, text: &str, default: &str) -> Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(text)
        .default(default.to_string())
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn prompt_validated(
    theme: &ColorfulTheme,
    text: &str,
    default: &str,
    validator: fn(&str) -> Result<(), String>,
) -> Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(text)
        .default(default.to_string())
        .validate_with(|input: &String| validator(input))
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn describe(text: &str) {
    println!("{}", style(text).dim());
}

fn network_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("Network Configuration");
    describe("The defaults are the standard mainnet ports.");

    describe("Peer-to-peer traffic with other nodes.");
    config.p2p_port = prompt_validated(theme, "P2P port", &config.p2p_port, validate::port)?;

    describe("gRPC API access to the node (mainnet: 16110).");
    config.grpc_port = prompt_validated(theme, "gRPC port", &config.grpc_port, validate::port)?;

    describe("wRPC with Borsh encoding (mainnet: 17110).");
    config.wrpc_borsh_port =
        prompt_validated(theme, "wRPC Borsh port", &config.wrpc_borsh_port, validate::port)?;

    describe("wRPC with JSON encoding (mainnet: 18110).");
    config.wrpc_json_port =
        prompt_validated(theme, "wRPC JSON port", &config.wrpc_json_port, validate::port)?;

    if let Some(ip) = local_ip() {
        println!("Detected local address: {}", style(ip).cyan());
    }
    describe("0.0.0.0 accepts connections on every interface.");
    config.external_ip =
        prompt_validated(theme, "External IP", &config.external_ip, validate::ip)?;

    Ok(())
}

fn container_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("Container Configuration");

    describe("Name of the Docker container (must be unique on this host).");
    config.container_name = prompt(theme, "Container name", &config.container_name)?;

    describe("Image name and tag; usually left as-is.");
    config.image_name = prompt(theme, "Image name", &config.image_name)?;
    config.image_tag = prompt(theme, "Image tag", &config.image_tag)?;

    Ok(())
}

fn data_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("Data Storage Configuration");

    describe("Host directory where the node stores its blockchain data.");
    config.data_volume_path = prompt_validated(
        theme,
        "Data directory",
        &config.data_volume_path,
        validate::host_path,
    )?;

    describe("Path inside the container; usually left as-is.");
    config.app_data_path = prompt(theme, "Container data path", &config.app_data_path)?;

    Ok(())
}

fn system_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("System Configuration");

    describe("DNS servers used by the node for network lookups.");
    config.dns_primary =
        prompt_validated(theme, "Primary DNS server", &config.dns_primary, validate::ip)?;
    config.dns_secondary = prompt_validated(
        theme,
        "Secondary DNS server",
        &config.dns_secondary,
        validate::ip,
    )?;

    describe("User and group the container runs as (0 = root).");
    config.user_id = prompt(theme, "User ID", &config.user_id)?;
    config.group_id = prompt(theme, "Group ID", &config.group_id)?;

    Ok(())
}

fn resource_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("Resource Limits");

    describe("File-descriptor limits; higher values allow more peer connections.");
    config.ulimit_soft = prompt(theme, "Soft file descriptor limit", &config.ulimit_soft)?;
    config.ulimit_hard = prompt(theme, "Hard file descriptor limit", &config.ulimit_hard)?;

    Ok(())
}

fn health_group(theme: &ColorfulTheme, config: &mut NodeEnvConfig) -> Result<()> {
    Console::title("Health Check Configuration");

    describe("How Docker decides whether the node container is healthy.");
    config.health_check_interval =
        prompt(theme, "Health check interval (e.g. 30s)", &config.health_check_interval)?;
    config.health_check_timeout =
        prompt(theme, "Health check timeout (e.g. 5s)", &config.health_check_timeout)?;
    config.health_check_retries = prompt(
        theme,
        "Retries before marking unhealthy",
        &config.health_check_retries,
    )?;
    config.health_check_start_period = prompt(
        theme,
        "Start period before checks begin (e.g. 60s)",
        &config.health_check_start_period,
    )?;

    Ok(())
}

/// Bind-test the four chosen ports; same technique and same caveats as the
/// pre-flight checker.
fn occupied_ports(config: &NodeEnvConfig) -> Vec<String> {
    Console::progress("Checking port availability");
    config
        .ports()
        .iter()
        .filter_map(|p| p.parse::<u16>().ok())
        .filter(|port| !port_available(*port))
        .map(|port| port.to_string())
        .collect()
}

/// Routing-table trick: connecting a UDP socket selects the outbound
/// interface without sending a packet.
fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip())
}

fn print_summary(config: &NodeEnvConfig) {
    Console::section("Configuration Summary");

    Console::title("Network");
    Console::info("P2P port", &config.p2p_port);
    Console::info("gRPC port", &config.grpc_port);
    Console::info("wRPC Borsh port", &config.wrpc_borsh_port);
    Console::info("wRPC JSON port", &config.wrpc_json_port);
    Console::info("External IP", &config.external_ip);

    Console::title("Container");
    Console::info("Container name", &config.container_name);
    Console::info(
        "Image",
        &format!("{}:{}", config.image_name, config.image_tag),
    );

    Console::title("Data Storage");
    Console::info("Host directory", &config.data_volume_path);
    Console::info("Container path", &config.app_data_path);

    Console::title("System");
    Console::info(
        "DNS",
        &format!("{}, {}", config.dns_primary, config.dns_secondary),
    );
    Console::info("User", &format!("{}:{}", config.user_id, config.group_id));
    Console::info(
        "File descriptors",
        &format!("{} / {}", config.ulimit_soft, config.ulimit_hard),
    );
    println!();
}

fn print_next_steps(config: &NodeEnvConfig) {
    Console::section("Next Steps");

    println!("Start the node:   {}", style("docker compose up -d").cyan());
    println!("Watch the logs:   {}", style("docker compose logs -f").cyan());
    println!("Stop the node:    {}", style("docker compose down").cyan());
    println!();
    println!(
        "gRPC endpoint:    {}",
        style(format!("localhost:{}", config.grpc_port)).cyan()
    );
    println!(
        "wRPC (Borsh):     {}",
        style(format!("ws://localhost:{}", config.wrpc_borsh_port)).cyan()
    );
    println!(
        "wRPC (JSON):      {}",
        style(format!("ws://localhost:{}", config.wrpc_json_port)).cyan()
    );
}
