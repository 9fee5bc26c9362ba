//! Settings, errors, cone descriptors and scaling state shared by the
//! KKT solvers.

mod cones;
mod error;
mod scaling;
mod settings;

pub use cones::*;
pub use error::*;
pub use scaling::*;
pub use settings::*;
