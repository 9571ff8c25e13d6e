use clap::Parser;
use psichain::config::EvolutionConfig;
use psichain::output;
use psichain::runner;
use std::io;
use std::time::Instant;

/// Fixed-step evolution of a 1-D chain of complex amplitudes
#[derive(Parser)]
#[command(name = "psichain", version)]
struct Cli {
    /// Number of chain sites (global size)
    sites: usize,

    /// Number of evolution steps
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Timestep
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Nearest-neighbour coupling strength J
    #[arg(long, default_value_t = 1.0)]
    coupling: f64,

    /// Number of worker threads the chain is split across
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// One worker per MPI rank instead of threads (launch under mpirun)
    #[cfg(feature = "distributed")]
    #[arg(long)]
    mpi: bool,

    /// Print peak memory and timing stats to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let total_start = Instant::now();
    let config = EvolutionConfig {
        steps: cli.steps,
        dt: cli.dt,
        coupling: cli.coupling,
    };

    #[cfg(feature = "distributed")]
    if cli.mpi {
        run_mpi(&cli, &config);
        if cli.stats {
            psichain::stats::display(total_start.elapsed());
        }
        return;
    }

    let result = if cli.workers <= 1 {
        runner::run_serial(cli.sites, &config).map(|(state, report)| (state, vec![report]))
    } else {
        runner::run_threaded(cli.sites, cli.workers, &config)
    };
    let (_state, reports) = result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut stdout = io::stdout();
    output::write_timings(&reports, &mut stdout).unwrap_or_else(|e| {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    });

    if cli.stats {
        psichain::stats::display(total_start.elapsed());
    }
}

/// One worker per MPI rank. Every rank prints its own timing line, so the
/// driver collects one line per worker across the job's combined output.
#[cfg(feature = "distributed")]
fn run_mpi(cli: &Cli, config: &EvolutionConfig) {
    use psichain::comm::HaloExchange;
    use psichain::comm_mpi::MpiComm;
    use psichain::engine;
    use psichain::partition::ChainLayout;
    use psichain::runner::WorkerReport;

    let mut comm = MpiComm::init().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let layout = ChainLayout::build(cli.sites, comm.num_workers(), comm.rank()).unwrap_or_else(
        |e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    );
    let mut segment = engine::initial_state(layout.length);

    // Start the clocks together.
    comm.barrier();
    let start = Instant::now();
    engine::evolve(&mut segment, &mut comm, config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    let report = WorkerReport {
        rank: layout.rank,
        sites: layout.length,
        elapsed,
    };
    let mut stdout = io::stdout();
    output::write_timings(&[report], &mut stdout).unwrap_or_else(|e| {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    });
}
