//! Run command implementation.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use amplisim_sim::{SimConfig, Simulator};

use super::common::{OutputFormat, load_circuit, print_counts, print_json, resolve_seed, spinner};

/// Execute the run command.
pub fn execute(
    config: &SimConfig,
    input: &str,
    shots: u64,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let circuit = load_circuit(input)?;
    let seed = resolve_seed(seed);

    if format == OutputFormat::Table {
        println!(
            "{} Running {} ({} shots, seed {})",
            style("→").cyan().bold(),
            style(input).green(),
            shots,
            seed
        );
        println!(
            "  Loaded: {} qubits, {} instructions",
            circuit.num_qubits(),
            circuit.len()
        );
    }

    let progress = spinner("Simulating...");
    let simulator = Simulator::with_config(config.clone());
    let mut rng = StdRng::seed_from_u64(seed);
    let result = simulator.run(&circuit, shots, &mut rng);
    progress.finish_and_clear();
    let result = result?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_counts(&result.counts, Some(result.execution_time_ms)),
    }

    Ok(())
}
