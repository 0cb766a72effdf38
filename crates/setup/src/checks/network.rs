//! Network probes: port availability, DNS, outbound HTTPS.

use std::net::{Ipv4Addr, TcpListener, ToSocketAddrs};
use std::time::Duration;

use super::report::{CheckReport, CheckResult, StatusSink};
use crate::config::REQUIRED_PORTS;

const DNS_PROBE_HOST: &str = "docker.io";
const HTTP_PROBE_URL: &str = "https://docker.io";
const HTTP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind-and-release on loopback. A successful bind means the port is free
/// right now; nothing stops another process taking it afterwards, which is
/// acceptable for an advisory pre-flight.
pub fn port_available(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}

pub fn check_ports(report: &mut CheckReport, sink: &mut dyn StatusSink) {
    for port in REQUIRED_PORTS {
        let result = if port_available(port) {
            CheckResult::pass_with(format!("Port {port}"), "available")
        } else {
            CheckResult::fail(format!("Port {port}"), "already in use")
        };
        report.record(sink, result);
    }
}

/// DNS resolution is the check; the follow-up HTTPS probe is advisory only
/// and never counts against the report.
pub fn check_connectivity(report: &mut CheckReport, sink: &mut dyn StatusSink) {
    let resolved = (DNS_PROBE_HOST, 443u16)
        .to_socket_addrs()
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false);

    if !resolved {
        report.record(
            sink,
            CheckResult::fail(
                "Network Connectivity",
                format!("DNS resolution of {DNS_PROBE_HOST} failed"),
            ),
        );
        return;
    }

    report.record(
        sink,
        CheckResult::pass_with("Network Connectivity", format!("resolved {DNS_PROBE_HOST}")),
    );

    match https_reachable() {
        Ok(()) => sink.note("Internet access confirmed; Docker Hub is reachable"),
        Err(e) => {
            log::debug!("https probe failed: {e}");
            sink.note("Cannot reach Docker Hub over HTTPS (may affect image pulls)");
        }
    }
}

fn https_reachable() -> reqwest::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_PROBE_TIMEOUT)
        .build()?;
    client.get(HTTP_PROBE_URL).send()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_probe_idempotent_and_releasing() {
        // Grab an ephemeral port, release it, then probe twice.
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(port_available(port));
        assert!(port_available(port), "first probe must not hold the port");
    }

    #[test]
    fn test_port_probe_detects_held_port() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(!port_available(port));
        drop(listener);
        assert!(port_available(port));
    }
}
