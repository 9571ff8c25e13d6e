//! Domain decomposition of the chain across workers.
//!
//! The chain is split into contiguous per-worker segments: `sites / workers`
//! each, with the remainder handed to the lowest ranks. Concatenating the
//! segments in rank order reconstructs the global chain.

use crate::error::{PsichainError, Result};

/// One worker's share of the chain: how many sites it owns and where its
/// segment starts in the global indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub length: usize,
    pub offset: usize,
}

/// Compute the segment table for `sites` chain sites across `workers`
/// workers, in rank order.
///
/// Fails if `workers` is zero or if some worker would receive an empty
/// segment (the engine needs at least one site per worker to have boundary
/// slots at all).
pub fn partition(sites: usize, workers: usize) -> Result<Vec<Segment>> {
    if workers == 0 {
        return Err(PsichainError::InvalidInput(
            "worker count must be positive".into(),
        ));
    }
    if sites < workers {
        return Err(PsichainError::InvalidInput(format!(
            "cannot split {sites} sites across {workers} workers"
        )));
    }

    let base = sites / workers;
    let remainder = sites % workers;

    let mut segments = Vec::with_capacity(workers);
    let mut offset = 0;
    for rank in 0..workers {
        let length = if rank < remainder { base + 1 } else { base };
        segments.push(Segment { length, offset });
        offset += length;
    }
    Ok(segments)
}

/// Per-worker partition descriptor: the worker's segment plus the identities
/// of its neighbours. Computed once at startup, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLayout {
    pub rank: usize,
    pub length: usize,
    pub offset: usize,
    /// Rank of the left neighbour, `None` at the left domain edge.
    pub left: Option<usize>,
    /// Rank of the right neighbour, `None` at the right domain edge.
    pub right: Option<usize>,
}

impl ChainLayout {
    /// Build the layout for one worker from the global problem shape.
    pub fn build(sites: usize, workers: usize, rank: usize) -> Result<Self> {
        let segments = partition(sites, workers)?;
        let segment = segments.get(rank).ok_or_else(|| {
            PsichainError::InvalidInput(format!(
                "rank {rank} out of range for {workers} workers"
            ))
        })?;
        Ok(Self {
            rank,
            length: segment.length,
            offset: segment.offset,
            left: (rank > 0).then(|| rank - 1),
            right: (rank + 1 < workers).then(|| rank + 1),
        })
    }
}
