//! Grover command implementation.
//!
//! Plans, runs and samples an amplitude amplification search.

use anyhow::Result;
use console::style;
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use amplisim_sim::{
    AmplitudeAmplification, Counts, DriverState, IterationPlan, Oracle, Sampler, SimConfig,
    SimResult,
};

use super::common::{OutputFormat, parse_marked, print_counts, print_json, progress_bar, resolve_seed};

#[derive(Serialize)]
struct GroverReport<'a> {
    num_qubits: usize,
    marked: Vec<String>,
    plan: &'a IterationPlan,
    iterations: usize,
    seed: u64,
    success_probability: f64,
    counts: &'a Counts,
}

/// Step the driver to `Done`, advancing `bar` once per round.
fn amplify(driver: &mut AmplitudeAmplification, bar: &ProgressBar) -> SimResult<()> {
    loop {
        match driver.step()? {
            DriverState::Done => return Ok(()),
            DriverState::Iterating { completed, .. } => bar.set_position(completed as u64),
            DriverState::Init | DriverState::Superposition => {}
        }
    }
}

/// Execute the grover command.
pub fn execute(
    config: &SimConfig,
    qubits: usize,
    marked: &[String],
    iterations: Option<usize>,
    shots: u64,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let oracle = Oracle::new(qubits, parse_marked(qubits, marked)?)?;
    let seed = resolve_seed(seed);

    let mut driver = AmplitudeAmplification::new(oracle.clone())?.with_config(config.clone());
    if let Some(k) = iterations {
        driver = driver.with_iterations(k);
    }
    let plan = *driver.plan();
    let rounds = driver.iterations();

    if format == OutputFormat::Table {
        println!(
            "{} Searching {} states for {} marked ({})",
            style("→").cyan().bold(),
            plan.search_space,
            plan.solutions,
            style(oracle.marked_bitstrings().join(", ")).green()
        );
        println!(
            "  Planned iterations: {}, running: {}",
            plan.iterations,
            style(rounds).yellow()
        );
    }

    let bar = progress_bar(rounds as u64, "Amplifying");
    let stepped = amplify(&mut driver, &bar);
    bar.finish_and_clear();
    stepped?;

    let state = driver.finish()?;
    let marked_states: Vec<usize> = oracle.marked().iter().copied().collect();
    let success_probability = state.probability_of(&marked_states)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let counts = Sampler::sample(&state, shots, &mut rng)?;

    match format {
        OutputFormat::Json => print_json(&GroverReport {
            num_qubits: qubits,
            marked: oracle.marked_bitstrings(),
            plan: &plan,
            iterations: rounds,
            seed,
            success_probability,
            counts: &counts,
        })?,
        OutputFormat::Table => {
            println!(
                "  Marked probability: {:.6} (expected {:.6})",
                style(success_probability).yellow().bold(),
                plan.success_probability_after(rounds)
            );
            print_counts(&counts, None);
        }
    }

    Ok(())
}
