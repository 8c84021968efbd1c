//! The coil analysis pipeline.
//!
//! One [`analyze`] call runs, in strict sequence: the temperature-adjustment
//! layer, geometry and empirical correction factors, skin-effect AC
//! resistance, the closed-form low-frequency inductance, the numeric
//! dispersion root-find, impedance and effective-inductance derivation, the
//! equivalent lumped circuit, and the self-resonance search. The pipeline is
//! pure: given an unchanged configuration it returns bit-identical results,
//! and independent configurations can be analyzed concurrently.

use std::f64::consts::PI;

use num_complex::Complex;

use crate::coil::CoilConfig;
use crate::constants::{angular_frequency, SPEED_OF_LIGHT, VACUUM_PERMEABILITY};
use crate::errors::CoilError;
use crate::math::{
    bessel_i0, bessel_i1, bessel_k0, bessel_k1, find_root_secant, minimize_scalar_bounded, Scalar,
};
use crate::proximity::ProximitySurface;

/// Temperature-adjusted geometry and the empirical correction factors feeding
/// the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilGeometry {
    /// Outer coil diameter (expanded former + expanded wire diameter).
    pub coil_diameter: Scalar,
    /// Axial distance between adjacent turns.
    pub pitch: Scalar,
    /// Medhurst proximity factor Φ.
    pub proximity_factor: Scalar,
    /// Proximity-corrected effective coil diameter.
    pub effective_diameter: Scalar,
    /// Effective pitch angle ψ in radians.
    pub pitch_angle: Scalar,
    /// Lundin field non-uniformity correction factor.
    pub k_lundin: Scalar,
    /// Rosa round-wire self-inductance correction factor.
    pub k_rosa: Scalar,
    /// Grover–Knight round-wire mutual-inductance correction factor.
    pub k_mutual: Scalar,
    /// Effective unrolled wire length along the helix.
    pub wire_length: Scalar,
}

/// Lundin's field non-uniformity factor, piecewise in `length / d_eff` with
/// the branch boundary at `d_eff == length`.
fn lundin_factor(length: Scalar, effective_diameter: Scalar) -> Scalar {
    if effective_diameter >= length {
        let r = length / effective_diameter;
        let mut k = (1.0 + 0.383901 * r.powi(2) + 0.017108 * r.powi(4))
            / (1.0 + 0.258952 * r.powi(2));
        k *= (4.0 / r).ln() - 0.5;
        k += 0.093842 * r.powi(2) + 0.002029 * r.powi(4) - 0.000801 * r.powi(6);
        k * (2.0 / PI) * r
    } else {
        let r = effective_diameter / length;
        let k = (1.0 + 0.383901 * r.powi(2) + 0.017108 * r.powi(4))
            / (1.0 + 0.258952 * r.powi(2));
        k - (4.0 / 3.0 / PI) * r
    }
}

/// Rosa's round-wire self-inductance correction: `5/4 − ln(2·pitch/d_wire)`.
fn rosa_factor(pitch: Scalar, wire_diameter: Scalar) -> Scalar {
    1.25 - (2.0 * pitch / wire_diameter).ln()
}

/// Grover–Knight round-wire mutual-inductance correction, a function of the
/// turn count only. Singular as `turns → 0` and `turns → 0.0246`; callers
/// keep N clear of both.
fn grover_knight_factor(turns: Scalar) -> Scalar {
    (-0.16725 / turns + 0.0033 / (turns * turns)) * turns.ln()
        + 0.337883 * (1.0 - 0.9754 / (turns - 0.0246))
}

/// Residual of the sheath-helix dispersion relation at radial wavenumber `h`:
///
/// `F(h) = K₁(ha)·I₁(ha) / (K₀(ha)·I₀(ha)) − (h/k₀ · tan ψ)²`
///
/// Its root ties the helical mode's radial decay to the axial propagation at
/// the operating frequency.
#[must_use]
pub fn helix_dispersion(h: Scalar, radius: Scalar, pitch_angle: Scalar, k0: Scalar) -> Scalar {
    let ha = h * radius;
    bessel_k1(ha) * bessel_i1(ha) / (bessel_k0(ha) * bessel_i0(ha))
        - (h / k0 * pitch_angle.tan()).powi(2)
}

/// Computes the temperature-adjusted geometry and correction factors for a
/// configuration. Exposed separately for the sweep solver's feasibility logic
/// and for tests.
#[must_use]
pub fn coil_geometry<S: ProximitySurface>(config: &CoilConfig, surface: &S) -> CoilGeometry {
    let wire_diameter = config.expanded_wire_diameter();
    let coil_diameter = config.expanded_former_diameter() + wire_diameter;
    let pitch = config.length / config.turns;

    let proximity_factor = surface.factor(config.length / coil_diameter, wire_diameter / pitch);

    let effective_diameter = coil_diameter - wire_diameter * (1.0 - 1.0 / proximity_factor.sqrt());
    let pitch_angle = (pitch / (PI * effective_diameter)).atan();

    CoilGeometry {
        coil_diameter,
        pitch,
        proximity_factor,
        effective_diameter,
        pitch_angle,
        k_lundin: lundin_factor(config.length, effective_diameter),
        k_rosa: rosa_factor(pitch, wire_diameter),
        k_mutual: grover_knight_factor(config.turns),
        wire_length: Scalar::hypot(config.turns * PI * effective_diameter, config.length),
    }
}

/// Immutable snapshot of one pipeline run. Values are at the configuration's
/// operating frequency unless noted otherwise.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    /// Characteristic impedance Z₀ of the helical mode, in Ω.
    pub char_impedance: Scalar,
    /// Skin depth δ in the wire, in meters.
    pub skin_depth: Scalar,
    /// Axial propagation factor β, in rad/m.
    pub prop_factor: Scalar,
    /// Effective series inductance at the operating frequency, in H.
    pub series_inductance: Scalar,
    /// Effective series AC resistance, in Ω.
    pub series_resistance: Scalar,
    /// Unloaded Q at the operating frequency.
    pub q_factor: Scalar,
    /// Low-frequency-equivalent series inductance, in H.
    pub equiv_inductance: Scalar,
    /// Low-frequency-equivalent series resistance, in Ω. NaN past
    /// self-resonance, where the defining quadratic has no real root.
    pub equiv_resistance: Scalar,
    /// Equivalent parallel stray capacitance, in F.
    pub equiv_capacitance: Scalar,
    /// Q of the low-frequency equivalent circuit.
    pub equiv_q: Scalar,
    /// Self-resonant frequency estimate, in Hz.
    pub resonant_frequency: Scalar,
}

impl AnalysisResult {
    /// Electrical phase shift β·length across a coil of physical length
    /// `length`, in radians.
    #[must_use]
    pub fn phase_shift(&self, length: Scalar) -> Scalar {
        self.prop_factor * length
    }

    /// Effective series impedance `Rs + jωL` at angular frequency `omega`.
    #[must_use]
    pub fn series_impedance(&self, omega: Scalar) -> Complex<Scalar> {
        Complex::new(self.series_resistance, omega * self.series_inductance)
    }

    /// Impedance of the low-frequency equivalent circuit (series R-L in
    /// parallel with the stray capacitance) at angular frequency `omega`.
    #[must_use]
    pub fn equivalent_impedance(&self, omega: Scalar) -> Complex<Scalar> {
        let branch = Complex::new(self.equiv_resistance, omega * self.equiv_inductance);
        let shunt_admittance = Complex::new(0.0, omega * self.equiv_capacitance);
        (branch.finv() + shunt_admittance).finv()
    }
}

/// Runs the full analysis pipeline for one configuration.
///
/// # Errors
///
/// Returns [`CoilError::Convergence`] when the dispersion root-find does not
/// converge (pathological geometries, e.g. a vanishing pitch angle); no stale
/// or default value is ever substituted.
pub fn analyze<S: ProximitySurface>(
    config: &CoilConfig,
    surface: &S,
) -> Result<AnalysisResult, CoilError> {
    let geometry = coil_geometry(config, surface);
    let omega = angular_frequency(config.frequency);
    let wire_diameter = config.expanded_wire_diameter();
    let rho = config.effective_resistivity();
    let mu_core = config.core_permeability * VACUUM_PERMEABILITY;

    // Skin depth and proximity-corrected series AC resistance. The (N-1)/N
    // factor models one fewer turn-to-turn transition than turns.
    let sigma = 1.0 / rho;
    let skin_depth = 1.0
        / (PI * config.frequency * VACUUM_PERMEABILITY * config.material.relative_permeability
            * sigma)
            .sqrt();
    let mut series_resistance = rho * geometry.wire_length
        / (PI * (wire_diameter * skin_depth - skin_depth * skin_depth))
        * geometry.proximity_factor;
    if config.turns > 1.0 {
        series_resistance *= (config.turns - 1.0) / config.turns;
    }

    // Frequency-independent series inductance (Lundin, Rosa, Grover-Knight).
    let d_eff = geometry.effective_diameter;
    let correction = mu_core * d_eff * config.turns * (geometry.k_rosa + geometry.k_mutual) / 2.0;
    let equiv_inductance = mu_core * PI * (d_eff * config.turns).powi(2)
        / (4.0 * config.length)
        * geometry.k_lundin
        - correction;

    // Radial wavenumber from the dispersion relation, started from the
    // midpoint of the two analytic bracket estimates.
    let k0 = omega / SPEED_OF_LIGHT;
    let radius = d_eff / 2.0;
    let psi = geometry.pitch_angle;
    let h1 = k0 / psi.tan().powi(2);
    let h2 = k0;
    let h = find_root_secant(|h| helix_dispersion(h, radius, psi, k0), (h1 + h2) / 2.0)?;
    let prop_factor = Scalar::hypot(k0, h);

    let char_impedance = 60.0 / k0 * prop_factor * bessel_i0(h * radius) * bessel_k0(h * radius);

    // Effective series inductance at the design frequency.
    let series_inductance =
        char_impedance / omega * (prop_factor * config.length).tan() * geometry.k_lundin
            - correction;

    // Unloaded Q and the low-frequency equivalent circuit.
    let x_eff_series = omega * series_inductance;
    let q_factor = x_eff_series / series_resistance;
    let r_eff_parallel = (q_factor * q_factor + 1.0) * series_resistance;
    let x_l_series = omega * equiv_inductance;
    let equiv_resistance = (r_eff_parallel
        - (r_eff_parallel * r_eff_parallel - 4.0 * x_l_series * x_l_series).sqrt())
        / 2.0;
    let equiv_q = x_l_series / equiv_resistance;

    // Parallel stray capacitance from equating the admittances of the
    // effective and equivalent-circuit reactances.
    let x_l_parallel = (equiv_q * equiv_q + 1.0) / (equiv_q * equiv_q) * x_l_series;
    let x_eff_parallel = (q_factor * q_factor + 1.0) / (q_factor * q_factor) * x_eff_series;
    let x_c_parallel = x_eff_parallel * x_l_parallel / (x_l_parallel - x_eff_parallel);
    let equiv_capacitance = -1.0 / (omega * x_c_parallel);

    // Self-resonance: minimize the squared dispersion residual over frequency,
    // assuming beta*length = pi/2 at resonance to recover h from omega. The
    // minimizer always returns the best in-bracket point; a zero residual is
    // not guaranteed.
    let beta_res = (PI / 2.0) / config.length;
    let residual = |w: Scalar| {
        let k = w / SPEED_OF_LIGHT;
        let h_res = (beta_res * beta_res - k * k).sqrt();
        helix_dispersion(h_res, radius, psi, k).powi(2)
    };
    let lo = SPEED_OF_LIGHT / geometry.wire_length / 40.0;
    let hi = SPEED_OF_LIGHT / geometry.wire_length * PI / 2.0;
    let (w_res, _) = minimize_scalar_bounded(residual, lo, hi);

    Ok(AnalysisResult {
        char_impedance,
        skin_depth,
        prop_factor,
        series_inductance,
        series_resistance,
        q_factor,
        equiv_inductance,
        equiv_resistance,
        equiv_capacitance,
        equiv_q,
        resonant_frequency: w_res / (2.0 * PI),
    })
}

/// The closed set of pipeline outputs the tuner and sensitivity analyzer may
/// target, with an explicit dispatch instead of by-name result indexing.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    /// Characteristic impedance Z₀.
    CharImpedance,
    /// Skin depth δ.
    SkinDepth,
    /// Propagation factor β.
    PropFactor,
    /// Effective series inductance at the operating frequency.
    SeriesInductance,
    /// Effective series AC resistance.
    SeriesResistance,
    /// Unloaded Q at the operating frequency.
    QFactor,
    /// Low-frequency-equivalent inductance.
    EquivInductance,
    /// Low-frequency-equivalent resistance.
    EquivResistance,
    /// Equivalent parallel stray capacitance.
    EquivCapacitance,
    /// Q of the equivalent circuit.
    EquivQ,
    /// Self-resonant frequency.
    ResonantFrequency,
}

impl OutputField {
    /// Reads the selected output from a result snapshot.
    #[must_use]
    pub const fn of(self, result: &AnalysisResult) -> Scalar {
        match self {
            Self::CharImpedance => result.char_impedance,
            Self::SkinDepth => result.skin_depth,
            Self::PropFactor => result.prop_factor,
            Self::SeriesInductance => result.series_inductance,
            Self::SeriesResistance => result.series_resistance,
            Self::QFactor => result.q_factor,
            Self::EquivInductance => result.equiv_inductance,
            Self::EquivResistance => result.equiv_resistance,
            Self::EquivCapacitance => result.equiv_capacitance,
            Self::EquivQ => result.equiv_q,
            Self::ResonantFrequency => result.resonant_frequency,
        }
    }

    /// Resolves an output name, rejecting anything outside the closed set.
    ///
    /// # Errors
    ///
    /// Returns [`CoilError::InvalidConfig`] for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CoilError> {
        match name {
            "char_impedance" => Ok(Self::CharImpedance),
            "skin_depth" => Ok(Self::SkinDepth),
            "prop_factor" => Ok(Self::PropFactor),
            "series_inductance" => Ok(Self::SeriesInductance),
            "series_resistance" => Ok(Self::SeriesResistance),
            "q_factor" => Ok(Self::QFactor),
            "equiv_inductance" => Ok(Self::EquivInductance),
            "equiv_resistance" => Ok(Self::EquivResistance),
            "equiv_capacitance" => Ok(Self::EquivCapacitance),
            "equiv_q" => Ok(Self::EquivQ),
            "resonant_frequency" => Ok(Self::ResonantFrequency),
            other => Err(CoilError::InvalidConfig(format!(
                "not an analysis output: {other:?}"
            ))),
        }
    }
}
