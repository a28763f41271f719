//! Plan command implementation.
//!
//! Reports the optimal iteration count without simulating anything.

use anyhow::{Context, Result};
use console::style;

use amplisim_sim::{IterationPlan, Oracle};

use super::common::{OutputFormat, parse_marked, print_json};

/// Execute the plan command.
pub fn execute(
    qubits: usize,
    marked: &[String],
    solutions: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let plan = match solutions {
        Some(m) => {
            anyhow::ensure!(qubits > 0, "A register needs at least one qubit");
            let space = u32::try_from(qubits)
                .ok()
                .and_then(|q| 1usize.checked_shl(q))
                .with_context(|| format!("{qubits} qubits is too many to plan for"))?;
            IterationPlan::compute(space, m)?
        }
        None => {
            let oracle = Oracle::new(qubits, parse_marked(qubits, marked)?)?;
            IterationPlan::for_oracle(&oracle)?
        }
    };

    match format {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Table => {
            println!(
                "{} Grover plan for {} marked of {} states",
                style("→").cyan().bold(),
                style(plan.solutions).green(),
                style(plan.search_space).green()
            );
            println!("  θ = asin(√(M/N)):     {:.6} rad", plan.theta);
            println!(
                "  Optimal iterations:   {}",
                style(plan.iterations).yellow().bold()
            );
            println!(
                "  Success probability:  {:.6}",
                style(plan.success_probability).yellow()
            );
            println!(
                "  Uniform baseline:     {:.6}",
                plan.success_probability_after(0)
            );
        }
    }

    Ok(())
}
