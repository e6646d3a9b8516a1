//! Pathways command-line interface.
//!
//! Drives single evaluations, grid sweeps, scaling studies and spectral
//! summaries of the forward/backward reconciliation engine.
//!
//! ```text
//!   ψ(0) ──U──▶ ψ(1) ──U──▶ … ──U──▶ ψ(T) ──▶ |ψ(T)|²
//!                                               │
//!   ψ̃(0) ◀─U⁻¹,R─ ψ̃(1) ◀─U⁻¹,R─ … ◀─U⁻¹,R─ √P(T) ◀┘
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

use commands::{evaluate, grid, scale, spectrum, sweep, version};
use pathways_core::Configuration;

/// Pathways - forward/backward quantum trajectory reconciliation
#[derive(Parser)]
#[command(name = "pathways")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Lattice and reconciliation parameters for a single configuration.
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Lattice size N
    #[arg(short = 'n', long, default_value = "3")]
    lattice_size: usize,

    /// Number of propagation steps T
    #[arg(short = 't', long, default_value = "5")]
    num_steps: usize,

    /// Time step dt
    #[arg(long, default_value = "1.0")]
    dt: f64,

    /// Quasi-periodic potential amplitude V0
    #[arg(long, default_value = "1.0")]
    v0: f64,

    /// Nearest-neighbour coupling g
    #[arg(short = 'g', long, default_value = "0.2")]
    coupling: f64,

    /// Gaussian noise amplitude on diagonal and couplings
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Phase-realignment period
    #[arg(short, long, default_value = "5")]
    precision: u32,
}

impl ConfigArgs {
    fn to_configuration(&self) -> Configuration {
        Configuration::new(self.lattice_size, self.num_steps, self.dt)
            .with_potential(self.v0)
            .with_coupling(self.coupling)
            .with_noise(self.noise)
            .with_phase_precision(self.precision)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one configuration and print its error
    Evaluate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Noise seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the error at every time step
        #[arg(long)]
        per_step: bool,

        /// Output file for JSON report
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Sweep a parameter grid and report the best configuration
    Sweep {
        /// Grid file (YAML or JSON); the reference grid if omitted
        #[arg(long)]
        grid: Option<String>,

        /// Base noise seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Evaluate on the calling thread only
        #[arg(long)]
        sequential: bool,

        /// Output file for JSON report
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Sweep the grid at several lattice sizes and compare gap uniformity
    Scale {
        /// Grid file (YAML or JSON); the reference grid if omitted
        #[arg(long)]
        grid: Option<String>,

        /// Lattice sizes, comma separated
        #[arg(long, value_delimiter = ',', default_values_t = [25, 50, 100, 200])]
        sizes: Vec<usize>,

        /// Base noise seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Evaluate on the calling thread only
        #[arg(long)]
        sequential: bool,

        /// Output file for JSON report
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Print the spectrum and gap uniformity of one Hamiltonian
    Spectrum {
        #[command(flatten)]
        config: ConfigArgs,

        /// Noise seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Print every eigenvalue
        #[arg(long)]
        eigenvalues: bool,

        /// Output file for JSON report
        #[arg(short, long)]
        export: Option<String>,
    },

    /// Print the reference grid (starting point for custom grids)
    Grid {
        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
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

    let result = match cli.command {
        Commands::Evaluate {
            config,
            seed,
            per_step,
            export,
        } => evaluate::execute(&config.to_configuration(), seed, per_step, export.as_deref()),

        Commands::Sweep {
            grid,
            seed,
            sequential,
            export,
        } => sweep::execute(grid.as_deref(), seed, !sequential, export.as_deref()),

        Commands::Scale {
            grid,
            sizes,
            seed,
            sequential,
            export,
        } => scale::execute(grid.as_deref(), &sizes, seed, !sequential, export.as_deref()),

        Commands::Spectrum {
            config,
            seed,
            eigenvalues,
            export,
        } => spectrum::execute(
            &config.to_configuration(),
            seed,
            eigenvalues,
            export.as_deref(),
        ),

        Commands::Grid { json } => grid::execute(json),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
