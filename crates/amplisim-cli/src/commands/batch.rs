//! Batch command implementation.
//!
//! Simulates every circuit of a labeled dataset and reports per-circuit
//! statistics: counts, exact probabilities and per-qubit expectations.

use anyhow::Result;
use console::style;

use amplisim_sim::{Axis, SimConfig, Simulator};

use super::common::{OutputFormat, load_dataset, print_json, resolve_seed, spinner};

/// Execute the batch command.
pub fn execute(
    config: &SimConfig,
    input: &str,
    shots: u64,
    seed: Option<u64>,
    axis: Axis,
    format: OutputFormat,
) -> Result<()> {
    let dataset = load_dataset(input)?;
    let seed = resolve_seed(seed);

    if format == OutputFormat::Table {
        println!(
            "{} Simulating {} labeled circuits from {} ({} shots each, seed {})",
            style("→").cyan().bold(),
            dataset.len(),
            style(input).green(),
            shots,
            seed
        );
    }

    let progress = spinner("Simulating batch...");
    let stats = Simulator::with_config(config.clone()).run_batch(&dataset, shots, seed, axis);
    progress.finish_and_clear();
    let stats = stats?;

    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Table => {
            println!(
                "\n  {:<12} {:<10} {:>8}  ⟨{}⟩ per qubit",
                "label", "top", "freq", axis
            );
            for (entry, s) in dataset.iter().zip(&stats) {
                let (top, freq) = s
                    .counts
                    .most_frequent()
                    .map(|(i, _)| {
                        (
                            amplisim_sim::statevector::bitstring(i, entry.circuit.num_qubits()),
                            s.counts.frequency(i),
                        )
                    })
                    .unwrap_or_default();
                let expectations: Vec<String> =
                    s.expectations.iter().map(|e| format!("{e:+.4}")).collect();
                println!(
                    "  {:<12} {:<10} {:>8.4}  {}",
                    style(s.label.to_string()).cyan(),
                    top,
                    freq,
                    expectations.join(" ")
                );
            }
        }
    }

    Ok(())
}
