use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::checks;
use crate::checks::report::ConsoleSink;
use crate::console::Console;
use crate::hardware::{score, HardwareProbe, HostProfile, SystemProbe};
use crate::installer;
use crate::wizard;

#[derive(Parser)]
#[command(author, version, about = "Prepare a host to run a containerized Kaspa node", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install Docker and Docker Compose with the native package manager
    Install,

    /// Run the pre-flight checks and print a hardware report
    Check,

    /// Interactively build the .env file consumed by docker-compose
    Wizard,
}

pub fn execute_command(command: &Commands) -> Result<()> {
    match command {
        Commands::Install => installer::run(),
        Commands::Check => run_check(),
        Commands::Wizard => wizard::run(),
    }
}

fn run_check() -> Result<()> {
    Console::section("Kaspa Node Pre-Flight Check");

    let profile = SystemProbe::new().profile();
    let mut sink = ConsoleSink;
    let report = checks::run_all(&profile, Path::new("."), &mut sink);

    print_hardware_report(&profile);

    Console::section("System Requirements Summary");
    Console::info(
        "Checks passed",
        &format!("{}/{}", report.passed(), report.total()),
    );
    if report.all_passed() {
        Console::success("All checks passed. This system is ready to run a Kaspa node.");
        Ok(())
    } else {
        Console::error("Some checks failed. Address the issues above and re-run.");
        std::process::exit(1);
    }
}

fn print_hardware_report(profile: &HostProfile) {
    Console::section("Hardware Performance");

    Console::info(
        "CPU",
        &format!(
            "{} ({} physical / {} logical cores)",
            profile.cpu_model, profile.physical_cores, profile.logical_cores
        ),
    );
    Console::info(
        "Memory",
        &format!(
            "{:.1} GiB total, {:.1} GiB available",
            profile.total_memory_gib(),
            profile.available_memory_gib()
        ),
    );
    Console::info(
        "Storage",
        &format!(
            "{} ({:.1} GiB free)",
            profile.storage.display(),
            profile.disk_free_gib()
        ),
    );

    let score = score::score(profile);
    Console::info("CPU score", &format!("{:.0}/100", score.cpu));
    Console::info("Memory score", &format!("{:.0}/100", score.memory));
    Console::info("Storage score", &format!("{:.0}/100", score.storage));
    Console::info("Overall", &format!("{:.1}/100", score.overall()));

    let tier = score.tier();
    Console::info("Tier", &format!("{} ({})", tier.label(), tier.advisory()));
    if !score.adequate() {
        Console::warning("Hardware is below the recommended profile for a Kaspa node");
    }
}
