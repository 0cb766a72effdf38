use std::time::Duration;

use console::style;

/// Terminal status-line helpers. One voice for the whole toolkit; the
/// pre-flight checks additionally route through a `StatusSink` so tests can
/// capture their output without a terminal.
pub struct Console;

impl Console {
    const WIDTH: usize = 46;

    fn horizontal_border() -> String {
        "═".repeat(Self::WIDTH)
    }

    pub fn section(title: &str) {
        println!();
        let formatted = format!("{:^width$}", title, width = Self::WIDTH);
        let border = Self::horizontal_border();

        println!("{}", style(format!("╔{border}╗")).cyan().bold());
        println!("{}", style(formatted).cyan().bold());
        println!("{}", style(format!("╚{border}╝")).cyan().bold());
    }

    pub fn title(text: &str) {
        println!();
        println!("{}", style(text).cyan().bold().underlined());
    }

    pub fn info(label: &str, value: &str) {
        println!("{}: {}", style(label).dim().cyan(), style(value).white());
    }

    pub fn success(text: &str) {
        println!("{} {}", style("✓").green().bold(), style(text).green());
    }

    pub fn warning(text: &str) {
        println!("{} {}", style("⚠").yellow().bold(), style(text).yellow());
    }

    pub fn error(text: &str) {
        println!("{} {}", style("✗").red().bold(), style(text).red());
    }

    pub fn progress(text: &str) {
        println!("{} {}", style("→").cyan().bold(), style(text).cyan());
    }

    pub fn step(number: usize, text: &str) {
        println!("{} {}", style(format!("[{number}]")).cyan().bold(), text);
    }

    /// One row of the pre-check table.
    pub fn check_line(name: &str, passed: bool, detail: Option<&str>) {
        let status = if passed {
            style("✓ PASS").green().bold()
        } else {
            style("✗ FAIL").red().bold()
        };
        println!("{name:<32} {status}");
        if let Some(detail) = detail {
            println!("{:<34}{}", "", style(detail).yellow());
        }
    }

    pub fn spinner(text: &str) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .expect("static spinner template"),
        );
        pb.set_message(text.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
