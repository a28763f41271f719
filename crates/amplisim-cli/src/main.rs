//! amplisim Command-Line Interface
//!
//! The main entry point for the `amplisim` tool: plan and run Grover
//! searches, simulate circuit files, and evaluate labeled circuit batches.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{AxisArg, OutputFormat, load_config};
use commands::{batch, grover, plan, run};

/// amplisim - dense state-vector simulation and amplitude amplification
#[derive(Parser)]
#[command(name = "amplisim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Simulator configuration file (YAML)
    #[arg(long, global = true, env = "AMPLISIM_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the optimal number of Grover iterations
    Plan {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Marked states (bitstrings or integers)
        #[arg(short, long, num_args = 1.., conflicts_with = "solutions")]
        marked: Vec<String>,

        /// Number of solutions, when the marked states themselves do not matter
        #[arg(long)]
        solutions: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run amplitude amplification and sample the result
    Grover {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Marked states (bitstrings or integers)
        #[arg(short, long, num_args = 1.., required = true)]
        marked: Vec<String>,

        /// Override the planned iteration count
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Random seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Simulate a JSON circuit file
    Run {
        /// Input file (JSON circuit description)
        #[arg(short, long)]
        input: String,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Random seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Simulate a labeled dataset of circuits
    Batch {
        /// Input file (JSON array of {"label", "circuit"})
        #[arg(short, long)]
        input: String,

        /// Shots per circuit
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Random seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Measurement axis for expectation values
        #[arg(short, long, value_enum, default_value = "z")]
        axis: AxisArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Plan {
            qubits,
            marked,
            solutions,
            format,
        } => plan::execute(qubits, &marked, solutions, format),

        Commands::Grover {
            qubits,
            marked,
            iterations,
            shots,
            seed,
            format,
        } => grover::execute(&config, qubits, &marked, iterations, shots, seed, format),

        Commands::Run {
            input,
            shots,
            seed,
            format,
        } => run::execute(&config, &input, shots, seed, format),

        Commands::Batch {
            input,
            shots,
            seed,
            axis,
            format,
        } => batch::execute(&config, &input, shots, seed, axis.into(), format),
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
