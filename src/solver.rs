//! Parallel grid search for phasing coils with a prescribed electrical length.
//!
//! A phasing coil delays the drive of one antenna element relative to another
//! by a fixed phase angle, so the interesting quantity is the total phase shift
//! `beta * length` accumulated along the winding rather than the inductance
//! itself. [`PhasingCoilSolver`] enumerates the cartesian product of turn
//! counts, former diameters and winding lengths, runs the full analysis
//! pipeline for each combination on a fixed pool of worker threads, and keeps
//! the windings whose phase shift lands within the requested tolerance band.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::analysis::analyze;
use crate::coil::CoilConfig;
use crate::errors::CoilError;
use crate::materials::{MaterialRegistry, WireMaterial};
use crate::math::Scalar;
use crate::proximity::MedhurstTable;

/// Search-space description for a phasing-coil grid search.
///
/// Dimensions mirror how such coils are actually bought and wound: wire comes
/// with a core diameter and an insulated outside diameter, formers come in a
/// handful of stock diameters rather than a continuum, and the winding length
/// is the knob with fine resolution. Lengths are stepped in whole micrometres
/// so the enumeration is exact regardless of the step expressed in mm.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PhasingCoilSpec {
    /// Phase shift to achieve across the coil (rad).
    pub phase_shift_rad: Scalar,
    /// Allowed relative deviation from the target phase shift (+/- percent).
    pub phase_shift_tolerance_pct: Scalar,
    /// Operating frequency (Hz).
    pub frequency: Scalar,
    /// Diameter of the bare wire core (mm).
    pub wire_core_diameter_mm: Scalar,
    /// Diameter of the wire including insulation (mm).
    pub wire_insulated_diameter_mm: Scalar,
    /// Inclusive range of turn counts to try.
    pub turns: (u32, u32),
    /// Stock former diameters to try (mm).
    pub former_diameters_mm: Vec<Scalar>,
    /// Winding length range as (start, stop, step) in mm, stop inclusive.
    pub length_range_mm: (Scalar, Scalar, Scalar),
    /// Wire material name as registered in the [`MaterialRegistry`].
    pub material: String,
    /// Optional cap on the air gap between adjacent insulated turns (mm).
    pub max_turn_spacing_mm: Option<Scalar>,
    /// Worker thread count override; defaults to available parallelism
    /// minus one, floored at one.
    pub workers: Option<usize>,
}

/// One winding accepted by the grid search.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CoilMatch {
    /// Number of turns.
    pub turns: u32,
    /// Former diameter (mm), as listed in the search spec.
    pub former_diameter_mm: Scalar,
    /// Winding length (mm).
    pub length_mm: Scalar,
    /// Achieved phase shift across the coil (rad).
    pub phase_shift_rad: Scalar,
    /// Air gap between adjacent insulated turns (mm).
    pub turn_spacing_mm: Scalar,
}

impl fmt::Display for CoilMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={}, diam_mm={}, len_mm={:.1}, phi={}, turn_spacing_mm={}",
            self.turns,
            self.former_diameter_mm,
            self.length_mm,
            self.phase_shift_rad,
            self.turn_spacing_mm
        )
    }
}

/// Exhaustive search over the space described by a [`PhasingCoilSpec`].
#[derive(Debug, Clone)]
pub struct PhasingCoilSolver {
    spec: PhasingCoilSpec,
    material: WireMaterial,
}

impl PhasingCoilSolver {
    /// Validates the spec and resolves the wire material.
    ///
    /// # Errors
    ///
    /// - [`CoilError::UnknownMaterial`] if the material name is not registered.
    /// - [`CoilError::InvalidConfig`] for empty or inverted search ranges.
    pub fn new(spec: PhasingCoilSpec, registry: &MaterialRegistry) -> Result<Self, CoilError> {
        let material = *registry.get(&spec.material)?;
        if spec.turns.0 > spec.turns.1 {
            return Err(CoilError::InvalidConfig(format!(
                "inverted turns range {:?}",
                spec.turns
            )));
        }
        let (start, stop, step) = spec.length_range_mm;
        if !(start.is_finite() && stop.is_finite() && step.is_finite())
            || start > stop
            || step <= 0.0
        {
            return Err(CoilError::InvalidConfig(format!(
                "bad length range ({start}, {stop}, {step}) mm"
            )));
        }
        if spec.former_diameters_mm.is_empty() {
            return Err(CoilError::InvalidConfig(
                "no former diameters to try".to_owned(),
            ));
        }
        Ok(Self { spec, material })
    }

    /// Worker threads used by [`solve`](Self::solve).
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.spec.workers.unwrap_or_else(|| {
            thread::available_parallelism().map_or(1, |p| p.get().saturating_sub(1).max(1))
        })
    }

    /// Cartesian product of (turns, former diameter, length) with lengths
    /// held as whole micrometres.
    fn combinations(&self) -> Vec<(u32, Scalar, i64)> {
        let (start, stop, step) = self.spec.length_range_mm;
        let start_um = (start * 1.0e3).round() as i64;
        let stop_um = (stop * 1.0e3).round() as i64;
        let step_um = ((step * 1.0e3).round() as i64).max(1);

        let mut combos = Vec::new();
        for turns in self.spec.turns.0..=self.spec.turns.1 {
            for &diam_mm in &self.spec.former_diameters_mm {
                let mut len_um = start_um;
                while len_um <= stop_um {
                    combos.push((turns, diam_mm, len_um));
                    len_um += step_um;
                }
            }
        }
        combos
    }

    /// Runs the full pipeline for one combination and applies the acceptance
    /// filters. `None` means rejected or numerically intractable.
    fn evaluate(
        &self,
        turns: u32,
        former_mm: Scalar,
        len_um: i64,
        table: &MedhurstTable,
    ) -> Option<CoilMatch> {
        let spec = &self.spec;
        let n = Scalar::from(turns);
        let len_mm = len_um as Scalar * 1.0e-3;

        // The winding must fit as a single layer of insulated wire.
        if len_mm < spec.wire_insulated_diameter_mm * n {
            return None;
        }
        let spacing_mm = (len_mm - spec.wire_insulated_diameter_mm * n) / n;
        if let Some(cap) = spec.max_turn_spacing_mm {
            if spacing_mm > cap {
                return None;
            }
        }

        // The effective coil diameter runs through the wire centers, one
        // insulated-wire diameter beyond the former.
        let config = CoilConfig::new(
            n,
            (former_mm + spec.wire_insulated_diameter_mm) * 1.0e-3,
            spec.wire_core_diameter_mm * 1.0e-3,
            len_um as Scalar * 1.0e-6,
            spec.frequency,
            self.material,
        );
        let report = analyze(&config, table).ok()?;
        let phase = report.phase_shift(config.length);

        let tol = spec.phase_shift_tolerance_pct / 100.0;
        let window = spec.phase_shift_rad * (1.0 - tol)..spec.phase_shift_rad * (1.0 + tol);
        if !window.contains(&phase) {
            return None;
        }
        Some(CoilMatch {
            turns,
            former_diameter_mm: former_mm,
            length_mm: len_mm,
            phase_shift_rad: phase,
            turn_spacing_mm: spacing_mm,
        })
    }

    /// Searches the whole space and returns every accepted winding, sorted by
    /// (turns, former diameter, length).
    ///
    /// Combinations are pulled from a shared queue by a fixed pool of scoped
    /// worker threads; each worker runs the analysis pipeline independently
    /// and streams accepted matches back over a channel. Combinations that
    /// fail to converge are skipped.
    #[must_use]
    pub fn solve(&self) -> Vec<CoilMatch> {
        let combos = self.combinations();
        let table = MedhurstTable::new();
        let next = AtomicUsize::new(0);
        let (match_tx, match_rx) = mpsc::channel::<CoilMatch>();

        let mut matches: Vec<CoilMatch> = thread::scope(|scope| {
            for _ in 0..self.worker_count() {
                let match_tx = match_tx.clone();
                let (combos, next, table) = (&combos, &next, &table);
                scope.spawn(move || {
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(&(turns, diam_mm, len_um)) = combos.get(i) else {
                            break;
                        };
                        if let Some(found) = self.evaluate(turns, diam_mm, len_um, table) {
                            // Receiver outlives the scope; a send failure
                            // would only mean the search was abandoned.
                            let _ = match_tx.send(found);
                        }
                    }
                });
            }
            drop(match_tx);
            match_rx.iter().collect()
        });

        matches.sort_by(|a, b| {
            (a.turns, a.former_diameter_mm, a.length_mm)
                .partial_cmp(&(b.turns, b.former_diameter_mm, b.length_mm))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches
    }
}
