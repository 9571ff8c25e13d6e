//! Halo exchange abstraction for distributed chain evolution.
//!
//! Provides a trait for the per-step boundary-value exchange between
//! neighbouring workers, a no-op single-worker implementation, and a
//! channel-backed implementation linking in-process worker threads.

use num_complex::Complex64;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::error::{PsichainError, Result};

/// Boundary values received from the neighbours during one exchange.
///
/// `None` on a side means no neighbour exists there; the caller leaves that
/// edge of its segment untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloValues {
    pub from_left: Option<Complex64>,
    pub from_right: Option<Complex64>,
}

/// Abstraction over boundary-value exchange between neighbouring workers.
///
/// Implementations: `SingleWorkerComm` (no-op), `ChannelComm` (in-process
/// threads), `MpiComm` (via mpi crate, `distributed` feature).
pub trait HaloExchange {
    /// Send this worker's boundary amplitudes to its neighbours and receive
    /// theirs in return.
    ///
    /// `left_send` goes to the left neighbour (where it becomes that
    /// worker's right-edge value), `right_send` to the right neighbour.
    /// Blocks until both sides complete; a side without a neighbour is
    /// skipped. A disconnected or failed peer is fatal.
    fn exchange(&mut self, left_send: Complex64, right_send: Complex64) -> Result<HaloValues>;

    /// This worker's rank (segment index).
    fn rank(&self) -> usize;

    /// Total number of workers (segments).
    fn num_workers(&self) -> usize;
}

/// No-op exchange for single-worker execution.
///
/// The lone worker owns the whole chain and has no neighbours, so both
/// domain edges stay fixed.
pub struct SingleWorkerComm;

impl HaloExchange for SingleWorkerComm {
    fn exchange(&mut self, _left_send: Complex64, _right_send: Complex64) -> Result<HaloValues> {
        // Single worker: no neighbours, nothing to exchange.
        Ok(HaloValues {
            from_left: None,
            from_right: None,
        })
    }

    fn rank(&self) -> usize {
        0
    }

    fn num_workers(&self) -> usize {
        1
    }
}

/// Channel-backed halo exchange for threaded in-process workers.
///
/// Each adjacent pair of workers is joined by two bounded channels, one per
/// direction. Capacity 1 lets both sides of a link complete their sends
/// before either receives, so the exchange cannot deadlock, while still
/// keeping neighbours within one step of each other.
pub struct ChannelComm {
    rank: usize,
    workers: usize,
    to_left: Option<SyncSender<Complex64>>,
    from_left: Option<Receiver<Complex64>>,
    to_right: Option<SyncSender<Complex64>>,
    from_right: Option<Receiver<Complex64>>,
}

impl ChannelComm {
    /// Build a fully linked set of exchanges for `workers` in-process
    /// workers, in rank order.
    pub fn linked(workers: usize) -> Vec<ChannelComm> {
        let mut comms: Vec<ChannelComm> = (0..workers)
            .map(|rank| ChannelComm {
                rank,
                workers,
                to_left: None,
                from_left: None,
                to_right: None,
                from_right: None,
            })
            .collect();

        for rank in 1..workers {
            // rank-1 -> rank and rank -> rank-1
            let (rightward_tx, rightward_rx) = sync_channel(1);
            let (leftward_tx, leftward_rx) = sync_channel(1);
            comms[rank - 1].to_right = Some(rightward_tx);
            comms[rank - 1].from_right = Some(leftward_rx);
            comms[rank].to_left = Some(leftward_tx);
            comms[rank].from_left = Some(rightward_rx);
        }
        comms
    }
}

impl HaloExchange for ChannelComm {
    fn exchange(&mut self, left_send: Complex64, right_send: Complex64) -> Result<HaloValues> {
        if let Some(tx) = &self.to_left {
            tx.send(left_send).map_err(|_| {
                PsichainError::Communication("left neighbour disconnected".into())
            })?;
        }
        if let Some(tx) = &self.to_right {
            tx.send(right_send).map_err(|_| {
                PsichainError::Communication("right neighbour disconnected".into())
            })?;
        }

        let from_left = match &self.from_left {
            Some(rx) => Some(rx.recv().map_err(|_| {
                PsichainError::Communication("left neighbour disconnected".into())
            })?),
            None => None,
        };
        let from_right = match &self.from_right {
            Some(rx) => Some(rx.recv().map_err(|_| {
                PsichainError::Communication("right neighbour disconnected".into())
            })?),
            None => None,
        };

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
