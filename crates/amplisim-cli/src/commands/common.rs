//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use amplisim_ir::Circuit;
use amplisim_sim::{Axis, Counts, LabeledCircuit, SimConfig};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Measurement axis as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

/// Simulator configuration from `--config`, or the environment.
pub fn load_config(path: Option<&str>) -> Result<SimConfig> {
    let config = match path {
        Some(path) => SimConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration: {path}"))?,
        None => SimConfig::from_env().context("Invalid AMPLISIM_* environment")?,
    };
    debug!(
        source = path.unwrap_or("environment"),
        max_qubits = config.max_qubits,
        parallel_threshold = config.parallel_threshold,
        "loaded simulator configuration"
    );
    Ok(config)
}

fn read_input(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Load a circuit from its JSON description.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let source = read_input(path)?;
    Circuit::from_json(&source).with_context(|| format!("Invalid circuit in {path}"))
}

/// Load a labeled dataset: a JSON array of `{"label": ..., "circuit": {...}}`.
pub fn load_dataset(path: &str) -> Result<Vec<LabeledCircuit<serde_json::Value>>> {
    let source = read_input(path)?;
    serde_json::from_str(&source).with_context(|| format!("Invalid dataset in {path}"))
}

/// Parse marked states given as n-bit strings (MSB first) or integers.
///
/// A token of exactly `num_qubits` binary digits is read as a bitstring;
/// anything else must be a decimal basis index.
pub fn parse_marked(num_qubits: usize, tokens: &[String]) -> Result<Vec<usize>> {
    tokens
        .iter()
        .map(|token| -> Result<usize> {
            let token = token.trim();
            if token.len() == num_qubits && token.chars().all(|c| c == '0' || c == '1') {
                return Ok(usize::from_str_radix(token, 2)?);
            }
            token.parse::<usize>().with_context(|| {
                format!("'{token}' is neither a {num_qubits}-bit string nor a basis index")
            })
        })
        .collect()
}

/// Seed to use: the given one, or a fresh random one.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    let resolved = seed.unwrap_or_else(rand::random);
    debug!(seed = resolved, random = seed.is_none(), "resolved sampling seed");
    resolved
}

/// A spinner for work of unknown length.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// A bar for `len` steps of known work.
pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(message.to_string());
    bar
}

/// Pretty JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}

/// Print counts as a histogram, most frequent first.
pub fn print_counts(counts: &Counts, execution_time_ms: Option<u64>) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.shots()
    );

    let mut sorted: Vec<(String, u64)> = counts.to_bitstring_map().into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let total = counts.shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(time_ms) = execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}
