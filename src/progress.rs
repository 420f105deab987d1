//! Progress display module
//!
//! Provides styled progress bars and statistics display for the pentesting aesthetic.

use crate::generator::GenerationStats;
use crate::output::ExportReport;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Color theme for the tool
pub mod theme {
    use colored::Color;

    pub const PRIMARY: Color = Color::Green;
    pub const ACCENT: Color = Color::Cyan;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║   ███╗   ███╗ █████╗ ██╗██╗      ██████╗██████╗  █████╗ ███████╗████████╗    ║
║   ████╗ ████║██╔══██╗██║██║     ██╔════╝██╔══██╗██╔══██╗██╔════╝╚══██╔══╝    ║
║   ██╔████╔██║███████║██║██║     ██║     ██████╔╝███████║█████╗     ██║       ║
║   ██║╚██╔╝██║██╔══██║██║██║     ██║     ██╔══██╗██╔══██║██╔══╝     ██║       ║
║   ██║ ╚═╝ ██║██║  ██║██║███████╗╚██████╗██║  ██║██║  ██║██║        ██║       ║
║   ╚═╝     ╚═╝╚═╝  ╚═╝╚═╝╚══════╝ ╚═════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝        ╚═╝       ║
║                                                                              ║
║                    Email Address Permutation Generator                       ║
║                         For Penetration Testing                              ║
║                                                              v1.0.0          ║
╚══════════════════════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.color(theme::PRIMARY));
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".color(theme::PRIMARY), text.color(theme::PRIMARY).bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".color(theme::ACCENT), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".color(theme::PRIMARY), text.color(theme::PRIMARY));
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".color(theme::WARNING), text.color(theme::WARNING));
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".color(theme::ERROR), text.color(theme::ERROR));
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".color(theme::PRIMARY), text);
}

/// Create a styled progress bar
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Bar when the number of addresses is known, spinner otherwise
pub fn create_generation_progress(expected: Option<u64>, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    match expected {
        Some(total) => create_progress_bar(total, "Generating..."),
        None => create_spinner("Generating..."),
    }
}

/// Print final statistics
pub fn print_summary(stats: &GenerationStats, elapsed: Duration, export: Option<&ExportReport>) {
    println!();
    println!("{}", "═".repeat(60).color(theme::PRIMARY));
    println!("{}", "                    GENERATION COMPLETE".color(theme::PRIMARY).bold());
    println!("{}", "═".repeat(60).color(theme::PRIMARY));
    println!();

    println!("  {} {}", "Emails generated:".green(),
        format_number(stats.total_generated).green().bold());
    println!("  {} {}", "Duplicates:      ".yellow(),
        format_number(stats.duplicates));
    if stats.invalid_emails > 0 {
        println!("  {} {}", "Too long:        ".red(),
            format_number(stats.invalid_emails).red());
    }

    if let Some(report) = export {
        println!();
        println!("  {} {}", "Output file:     ".green(), report.path.display());
        println!("  {} {}", "Output size:     ".green(), ByteSize(report.bytes_written));
    }

    println!();
    println!("  {} {}", "Duration:        ".green(), format_duration(elapsed));
    println!("  {} {:.2} emails/sec", "Throughput:      ".green(),
        per_second(stats.total_generated, elapsed));
    println!();
    println!("{}", "═".repeat(60).color(theme::PRIMARY));
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(676), "676");
        assert_eq!(format_number(2860), "2,860");
        assert_eq!(format_number(11881376), "11,881,376");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_per_second() {
        assert_eq!(per_second(100, Duration::from_secs(2)), 50.0);
        assert_eq!(per_second(100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_hidden_progress_when_quiet() {
        let pb = create_generation_progress(Some(10), true);
        assert!(pb.is_hidden());
    }
}
