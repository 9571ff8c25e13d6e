//! Multi-process distributed evolution tests.
//!
//! These tests require MPI and the `distributed` feature flag.
//! Run with: mpirun -n 2 cargo test --features distributed --test distributed_test
//!
//! Without MPI installed, these tests are excluded from the default build.
//! MPI may be initialized only once per process, so everything lives in a
//! single test function.

#![cfg(feature = "distributed")]

use psichain::comm::HaloExchange;
use psichain::comm_mpi::MpiComm;
use psichain::config::EvolutionConfig;
use psichain::engine;
use psichain::partition::ChainLayout;
use psichain::runner;

#[test]
fn distributed_evolution_over_world_ranks() {
    let mut comm = MpiComm::init().expect("MPI init failed");
    let workers = comm.num_workers();
    let sites = 2 * workers;

    let config = EvolutionConfig {
        steps: 1,
        dt: 0.01,
        coupling: 1.0,
    };
    let layout = ChainLayout::build(sites, workers, comm.rank()).expect("layout failed");
    let mut segment = engine::initial_state(layout.length);

    engine::evolve(&mut segment, &mut comm, &config).expect("evolve failed");

    // With two all-ones sites per rank, the halo overwrite rewrites ones
    // with ones and the single local pair lands on c - i*s everywhere.
    let c = (config.coupling * config.dt).cos();
    let s = (config.coupling * config.dt).sin();
    for amplitude in &segment {
        assert!((amplitude.re - c).abs() < 1e-12, "re={}", amplitude.re);
        assert!((amplitude.im + s).abs() < 1e-12, "im={}", amplitude.im);
    }

    // Degenerate single-rank case: the MPI backend must reproduce the
    // serial run bit-for-bit.
    if workers == 1 {
        let serial_config = EvolutionConfig {
            steps: 40,
            dt: 0.01,
            coupling: 1.0,
        };
        let (serial, _) = runner::run_serial(6, &serial_config).expect("serial run failed");

        let mut mpi_state = engine::initial_state(6);
        engine::evolve(&mut mpi_state, &mut comm, &serial_config).expect("evolve failed");
        assert_eq!(mpi_state, serial);
    }
}
