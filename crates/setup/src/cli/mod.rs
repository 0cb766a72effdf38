mod command;

pub use command::{execute_command, Cli, Commands};
