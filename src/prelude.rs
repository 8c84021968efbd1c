//! Convenience re-exports for everyday coil analysis.

pub use crate::analysis::{analyze, coil_geometry, AnalysisResult, CoilGeometry, OutputField};
pub use crate::coil::{
    expanded_former_diameter, expanded_wire_diameter, CoilConfig, TunableField,
};
pub use crate::constants::*;
pub use crate::errors::CoilError;
pub use crate::materials::{MaterialRegistry, WireMaterial};
pub use crate::math::Scalar;
pub use crate::proximity::{MedhurstTable, ProximitySurface};
pub use crate::solver::{CoilMatch, PhasingCoilSolver, PhasingCoilSpec};
pub use crate::tuning::{sensitivity, sensitivity_with_delta, tune_parameter};
