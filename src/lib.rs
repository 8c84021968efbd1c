#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Physical constants and frequency helpers.
pub mod constants;
/// Shared numerical utilities (Bessel functions, root finding, minimization).
pub mod math;
/// Error types shared across the crate.
pub mod errors;
/// Wire material data and the material registry.
pub mod materials;
/// Medhurst proximity-effect resistance factors.
pub mod proximity;
/// Coil configuration, thermal expansion, and tunable parameters.
pub mod coil;
/// The sheath-helix analysis pipeline and its outputs.
pub mod analysis;
/// Single-parameter tuning and sensitivity analysis.
pub mod tuning;
/// Parallel grid search for phasing coils.
pub mod solver;

/// Common exports for downstream crates.
pub mod prelude;
