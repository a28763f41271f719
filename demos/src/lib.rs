//! amplisim demo suite
//!
//! Small, self-contained circuits that show the simulator at work:
//!
//! - **Input encoding**: writing classical bits into a register with X gates
//! - **Half adder**: CNOT and Toffoli gates computing sum and carry
//! - **Grover's search**: a gate-level circuit next to the
//!   [`amplisim_sim::AmplitudeAmplification`] driver
//!
//! ```rust
//! use amplisim_demos::circuits::adder::{decode_output, half_adder};
//! use amplisim_sim::Simulator;
//!
//! let circuit = half_adder(true, true).unwrap();
//! let result = Simulator::new().run_seeded(&circuit, 10, 0).unwrap();
//! let (outcome, _) = result.counts.most_frequent().unwrap();
//! assert_eq!(decode_output(outcome), (true, false));
//! ```

pub mod circuits;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
