use clap::Parser;

use kaspa_setup::console::Console;
use kaspa_setup::error::SetupError;
use kaspa_setup::{execute_command, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // Everything in this binary is sequential and blocking; an interrupt
    // anywhere becomes a clean exit code 1.
    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        Console::warning("Cancelled by user");
        std::process::exit(1);
    }) {
        log::warn!("could not install the interrupt handler: {e}");
    }

    if let Err(e) = execute_command(&cli.command) {
        let already_reported = matches!(
            e.downcast_ref::<SetupError>(),
            Some(SetupError::Cancelled)
        );
        if !already_reported {
            Console::error(&format!("{e:#}"));
        }
        std::process::exit(1);
    }
}
