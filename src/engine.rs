//! Fixed-step evolution of one worker's chain segment.
//!
//! Each step exchanges single boundary amplitudes with the neighbouring
//! workers, overwrites the local edge slots with the received values, then
//! runs a pairwise update sweep over adjacent sites. The sweep is
//! sequential: pair `i+1` consumes the value pair `i` just wrote, so the
//! left-to-right order is part of the contract, not an implementation
//! detail.

use num_complex::Complex64;

use crate::comm::HaloExchange;
use crate::config::EvolutionConfig;
use crate::error::{PsichainError, Result};

/// Allocate a fresh segment of `length` sites, all at amplitude 1+0i.
pub fn initial_state(length: usize) -> Vec<Complex64> {
    vec![Complex64::new(1.0, 0.0); length]
}

/// Evolve `segment` in place for `config.steps` steps.
///
/// Per step, in strict order: capture the two boundary amplitudes, exchange
/// them with the neighbours through `comm`, overwrite the edge slots with
/// whatever came back (edges at the domain boundary stay fixed), then sweep.
/// The exchange is the only blocking operation; a worker with no neighbours
/// degenerates to the serial form of the same update.
pub fn evolve<C: HaloExchange>(
    segment: &mut [Complex64],
    comm: &mut C,
    config: &EvolutionConfig,
) -> Result<()> {
    let _span = tracing::debug_span!(
        "evolve",
        rank = comm.rank(),
        sites = segment.len(),
        steps = config.steps
    )
    .entered();

    if segment.is_empty() {
        return Err(PsichainError::InvalidInput(
            "segment must hold at least one site".into(),
        ));
    }

    let angle = config.coupling * config.dt;
    let cos_term = angle.cos();
    // i*sin(J*dt), the off-diagonal factor of the two-site update.
    let sin_term = Complex64::new(0.0, angle.sin());
    let last = segment.len() - 1;

    for _ in 0..config.steps {
        let halo = comm.exchange(segment[0], segment[last])?;

        if let Some(value) = halo.from_left {
            segment[0] = value;
        }
        if let Some(value) = halo.from_right {
            segment[last] = value;
        }

        pair_sweep(segment, cos_term, sin_term);
    }

    tracing::debug!(rank = comm.rank(), "evolution finished");
    Ok(())
}

/// One left-to-right sweep over adjacent pairs.
///
/// `temp` captures the left operand before it is overwritten, so each pair
/// mixes its own pre-update values; the next pair then starts from the
/// freshly written right element.
fn pair_sweep(segment: &mut [Complex64], cos_term: f64, sin_term: Complex64) {
    for i in 0..segment.len().saturating_sub(1) {
        let temp = segment[i];
        segment[i] = cos_term * segment[i] - sin_term * segment[i + 1];
        segment[i + 1] = cos_term * segment[i + 1] - sin_term * temp;
    }
}
