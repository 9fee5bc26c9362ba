//! Reference fixtures for the KKT solvers.
//!
//! A fixture records one KKT solve: the problem dimensions, the Gram
//! matrix, the scaling diagonal, a right hand side and the expected
//! solution.  Fixtures are produced by a [`FixtureGenerator`] from a
//! seeded [`FixtureConfig`], using the dense solver as ground truth,
//! and can be saved to / loaded from JSON with the `serde` feature.
//!
//! All stored values are rounded to 15 significant digits.

mod case;
mod config;
mod generator;

pub use case::*;
pub use config::*;
pub use generator::*;

use crate::solver::KKTError;
use thiserror::Error;

/// Error type returned by fixture generation, checking and file I/O
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A KKT solver error while processing the named case
    #[error("case \"{case}\": {source}")]
    Case { case: String, source: KKTError },
    /// The solutions of the named case differ by more than the tolerance
    #[error("case \"{case}\": error_x = {error_x:e}, error_z = {error_z:e} exceeds tolerance {tol:e}")]
    Tolerance {
        case: String,
        error_x: f64,
        error_z: f64,
        tol: f64,
    },
}
