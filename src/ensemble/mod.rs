//! Ensemble backends
//!
//! Provides the PAV ensemble backend, which combines suggestions from
//! multiple weighted source backends after calibrating each source's scores
//! with per-concept isotonic regression.

mod pav;

pub use pav::PavBackend;
