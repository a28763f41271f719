//! Half Adder Demo
//!
//! Encodes each pair of input bits, runs the CNOT/Toffoli half adder and
//! reads sum and carry back from the measured register.

use anyhow::{Context, Result};
use clap::Parser;

use amplisim_demos::circuits::adder::{decode_output, half_adder};
use amplisim_demos::circuits::encoding::{cnot_copy, encode_input};
use amplisim_demos::{print_header, print_result, print_section, print_success};
use amplisim_sim::Simulator;
use amplisim_sim::statevector::bitstring;

#[derive(Parser, Debug)]
#[command(name = "demo-adder")]
#[command(about = "Demonstrate input encoding and a quantum half adder")]
struct Args {
    /// Shots per circuit
    #[arg(short, long, default_value = "100")]
    shots: u64,

    /// Random seed
    #[arg(long, default_value = "7")]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let simulator = Simulator::new();

    print_header("Half Adder Demo");

    print_section("Input Encoding");
    for (name, circuit) in [("encode 3", encode_input(3, 0b011)?), ("cnot copy", cnot_copy()?)] {
        let result = simulator.run_seeded(&circuit, args.shots, args.seed)?;
        let (outcome, _) = result
            .counts
            .most_frequent()
            .context("no measurement outcomes")?;
        print_result(name, format!("|{}⟩", bitstring(outcome, result.num_qubits)));
    }

    print_section("Truth Table");
    println!("  a b | carry sum");
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let result = simulator.run_seeded(&half_adder(a, b)?, args.shots, args.seed)?;
        let (outcome, hits) = result
            .counts
            .most_frequent()
            .context("no measurement outcomes")?;
        let (carry, sum) = decode_output(outcome);
        println!(
            "  {} {} |   {}    {}   ({hits}/{} shots)",
            u8::from(a),
            u8::from(b),
            u8::from(carry),
            u8::from(sum),
            result.shots
        );
    }

    println!();
    print_success("Half adder demo complete!");
    Ok(())
}
