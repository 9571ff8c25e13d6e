//! Fixed-step evolution of a 1-D chain of complex amplitudes, serial or
//! domain-decomposed across workers with a per-step halo exchange.
//!
//! The chain is partitioned into contiguous segments ([`partition`]), each
//! worker evolves its segment in lockstep ([`engine`]), and the segment
//! boundaries flow between neighbours through a pluggable exchange backend
//! ([`comm`]; MPI variant in [`comm_mpi`] behind the `distributed` feature).

pub mod comm;
#[cfg(feature = "distributed")]
pub mod comm_mpi;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod partition;
pub mod runner;
pub mod stats;
