//! MPI halo-exchange backend.
//!
//! Requires the `distributed` feature flag and an MPI installation.
//! Implements [`HaloExchange`] over `mpi::traits::*` with one worker per
//! rank; the neighbours are the adjacent ranks in the world communicator.
//!
//! # Usage
//!
//! ```ignore
//! let mut comm = MpiComm::init()?; // initializes MPI, finalized on drop
//! ```
//!
//! # Deadlock avoidance
//!
//! Exchanges use blocking send/recv with rank-based ordering: against a
//! higher-ranked peer this rank sends first, against a lower-ranked peer it
//! receives first. Each amplitude crosses the wire as two f64 words
//! (re, im), a fixed 16-byte payload.

use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use num_complex::Complex64;

use crate::comm::{HaloExchange, HaloValues};
use crate::error::{PsichainError, Result};

/// MPI-based halo exchange.
///
/// Owns the MPI universe: constructing it initializes MPI, dropping it
/// finalizes. At most one may exist per process.
pub struct MpiComm {
    _universe: Universe,
    rank: usize,
    workers: usize,
    left: Option<usize>,
    right: Option<usize>,
}

impl MpiComm {
    /// Initialize MPI and build the exchange for this process's rank.
    pub fn init() -> Result<Self> {
        let universe = mpi::initialize().ok_or_else(|| {
            PsichainError::Communication("MPI initialization failed".into())
        })?;
        let world = SimpleCommunicator::world();
        let rank = world.rank() as usize;
        let workers = world.size() as usize;
        Ok(Self {
            _universe: universe,
            rank,
            workers,
            left: (rank > 0).then(|| rank - 1),
            right: (rank + 1 < workers).then(|| rank + 1),
        })
    }

    /// Synchronization barrier across all ranks.
    pub fn barrier(&self) {
        let world = SimpleCommunicator::world();
        world.barrier();
    }
}

impl HaloExchange for MpiComm {
    fn exchange(&mut self, left_send: Complex64, right_send: Complex64) -> Result<HaloValues> {
        let world = SimpleCommunicator::world();
        let mut from_left = None;
        let mut from_right = None;

        if let Some(left) = self.left {
            let peer = world.process_at_rank(left as i32);
            let send = [left_send.re, left_send.im];
            let mut recv = [0.0f64; 2];
            // Lower-ranked peer: receive first, then send.
            peer.receive_into(&mut recv[..]);
            peer.send(&send[..]);
            from_left = Some(Complex64::new(recv[0], recv[1]));
        }

        if let Some(right) = self.right {
            let peer = world.process_at_rank(right as i32);
            let send = [right_send.re, right_send.im];
            let mut recv = [0.0f64; 2];
            // Higher-ranked peer: send first, then receive.
            peer.send(&send[..]);
            peer.receive_into(&mut recv[..]);
            from_right = Some(Complex64::new(recv[0], recv[1]));
        }

        Ok(HaloValues {
            from_left,
            from_right,
        })
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn num_workers(&self) -> usize {
        self.workers
    }
}
