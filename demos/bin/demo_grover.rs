//! Grover's Search Algorithm Demo
//!
//! Builds the search as a gate-level circuit, runs the same search through
//! the amplitude amplification driver, and compares the two.

use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use amplisim_demos::circuits::grover::{grover_circuit, planned_iterations};
use amplisim_demos::{
    create_progress_bar, print_header, print_info, print_result, print_section, print_success,
};
use amplisim_sim::statevector::bitstring;
use amplisim_sim::{AmplitudeAmplification, DriverState, Oracle, Sampler, StateVector};

#[derive(Parser, Debug)]
#[command(name = "demo-grover")]
#[command(about = "Demonstrate Grover's search algorithm")]
struct Args {
    /// Number of qubits (search space size = 2^n)
    #[arg(short = 'n', long, default_value = "4")]
    qubits: u32,

    /// Marked states to search for (0 to 2^n - 1)
    #[arg(short, long, num_args = 1.., default_value = "7")]
    marked: Vec<usize>,

    /// Number of Grover iterations (0 = planned)
    #[arg(short, long, default_value = "0")]
    iterations: usize,

    /// Number of shots
    #[arg(short, long, default_value = "1000")]
    shots: u64,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(
        (1..=16).contains(&args.qubits),
        "the demo supports 1 to 16 qubits"
    );
    let n = args.qubits as usize;

    print_header("Grover's Search Algorithm Demo");

    let oracle = Oracle::new(n, args.marked.iter().copied())?;
    let iterations = if args.iterations == 0 {
        planned_iterations(args.qubits, oracle.num_solutions())?
    } else {
        args.iterations
    };

    print_section("Problem Setup");
    print_result("Qubits", n);
    print_result("Search space size", oracle.search_space());
    print_result("Marked states", oracle.marked_bitstrings().join(", "));
    print_result("Grover iterations", iterations);

    print_section("Gate-Level Circuit");
    let marked: Vec<usize> = oracle.marked().iter().copied().collect();
    let circuit = grover_circuit(args.qubits, &marked, iterations)?;
    print_result("Instructions", circuit.len());
    let mut gate_level = StateVector::new(n)?;
    gate_level.apply_circuit(&circuit)?;
    let gate_probability = gate_level.probability_of(&marked)?;
    print_result(
        "Success probability",
        format!("{:.2}%", gate_probability * 100.0),
    );

    print_section("Amplitude Amplification Driver");
    let mut driver = AmplitudeAmplification::new(oracle)?.with_iterations(iterations);
    let bar = create_progress_bar(iterations as u64, "Grover rounds");
    while driver.state() != DriverState::Done {
        match driver.step()? {
            DriverState::Iterating { completed, .. } => bar.set_position(completed as u64),
            DriverState::Done => bar.set_position(iterations as u64),
            _ => {}
        }
    }
    bar.finish_and_clear();
    let state = driver.finish()?;
    let driver_probability = state.probability_of(&marked)?;
    print_result(
        "Success probability",
        format!("{:.2}%", driver_probability * 100.0),
    );
    print_result(
        "Agreement",
        format!("{:.2e}", (driver_probability - gate_probability).abs()),
    );

    print_section("Measurement");
    let mut rng = StdRng::seed_from_u64(args.seed);
    let counts = Sampler::sample(&state, args.shots, &mut rng)?;
    let (top, hits) = counts
        .most_frequent()
        .context("no measurement outcomes")?;
    print_result("Shots", counts.shots());
    print_result(
        "Most frequent",
        format!("|{}⟩ ({hits} hits)", bitstring(top, n)),
    );
    let found: u64 = marked.iter().map(|&i| counts.get(i)).sum();
    print_result(
        "Marked hits",
        format!(
            "{found}/{} ({:.1}%)",
            counts.shots(),
            found as f64 / counts.shots().max(1) as f64 * 100.0
        ),
    );

    println!();
    print_success("Grover demo complete!");
    print_info(&format!(
        "Classical search needs O(N) = O({}) queries; Grover needs O(√N) ≈ {:.1}",
        1usize << n,
        ((1usize << n) as f64).sqrt()
    ));
    Ok(())
}
