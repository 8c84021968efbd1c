//! Proximity-effect correction surface (Medhurst's empirical table).
//!
//! Medhurst measured the AC-resistance multiplier Φ of single-layer coils as
//! a function of two geometric ratios: coil length over coil diameter, and
//! wire diameter over winding pitch. The table is reproduced here verbatim
//! and interpolated bilinearly.

use nalgebra::SMatrix;

use crate::math::Scalar;

/// Sentinel knot standing in for "infinitely long coil" on the
/// length/diameter axis.
pub const INFINITE_LENGTH_RATIO: Scalar = 20.0;

/// Length/diameter axis knots (12 columns).
const LENGTH_OVER_DIAMETER: [Scalar; 12] = [
    0.0,
    0.2,
    0.4,
    0.6,
    0.8,
    1.0,
    2.0,
    4.0,
    6.0,
    8.0,
    10.0,
    INFINITE_LENGTH_RATIO,
];

/// Wire-diameter/pitch axis knots (11 rows).
const WIRE_OVER_PITCH: [Scalar; 11] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Source for the scalar proximity factor Φ ≥ 1 given the two winding ratios.
///
/// Implemented by [`MedhurstTable`]; a trait seam so tests can substitute a
/// constant or analytic surface.
pub trait ProximitySurface {
    /// Interpolated proximity factor at (length/diameter, wire-diameter/pitch).
    fn factor(&self, length_over_diameter: Scalar, wire_over_pitch: Scalar) -> Scalar;
}

/// Medhurst's 11×12 empirical grid with bilinear interpolation.
#[derive(Debug, Clone)]
pub struct MedhurstTable {
    grid: SMatrix<Scalar, 11, 12>,
}

impl MedhurstTable {
    /// Builds the table from the published Medhurst data.
    #[must_use]
    #[rustfmt::skip]
    pub fn new() -> Self {
        // Rows: wire/pitch 0.0 ..= 1.0; columns: length/diameter knots.
        let grid = SMatrix::<Scalar, 11, 12>::from_row_slice(&[
            1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.000, 1.00, 1.000,
            1.02, 1.02, 1.03, 1.03, 1.03, 1.03, 1.04, 1.04, 1.04, 1.040, 1.04, 1.050,
            1.07, 1.08, 1.08, 1.10, 1.10, 1.10, 1.13, 1.15, 1.16, 1.165, 1.17, 1.190,
            1.16, 1.19, 1.21, 1.22, 1.23, 1.24, 1.28, 1.32, 1.34, 1.340, 1.35, 1.395,
            1.20, 1.29, 1.33, 1.38, 1.42, 1.45, 1.50, 1.54, 1.56, 1.570, 1.58, 1.650,
            1.44, 1.48, 1.54, 1.60, 1.64, 1.67, 1.74, 1.78, 1.80, 1.810, 1.83, 1.930,
            1.74, 1.77, 1.83, 1.89, 1.92, 1.94, 1.98, 2.01, 2.03, 2.080, 2.10, 2.220,
            2.12, 2.20, 2.28, 2.38, 2.44, 2.47, 2.32, 2.27, 2.29, 2.340, 2.27, 2.510,
            2.74, 2.83, 2.97, 3.10, 3.20, 3.17, 2.74, 2.60, 2.60, 2.620, 2.65, 2.815,
            3.73, 3.84, 3.99, 4.11, 4.17, 4.10, 3.36, 3.05, 2.92, 2.900, 2.93, 3.110,
            5.31, 5.45, 5.65, 5.80, 5.80, 5.55, 4.10, 3.54, 3.31, 3.200, 3.23, 3.410,
        ]);
        Self { grid }
    }
}

impl Default for MedhurstTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the knot interval containing `value`; out-of-range values map to
/// the nearest edge interval, which linearly extrapolates.
fn interval(axis: &[Scalar], value: Scalar) -> usize {
    let last = axis.len() - 2;
    if value <= axis[0] {
        return 0;
    }
    if value >= axis[last] {
        return last;
    }
    let mut i = 0;
    while axis[i + 1] < value {
        i += 1;
    }
    i
}

impl ProximitySurface for MedhurstTable {
    fn factor(&self, length_over_diameter: Scalar, wire_over_pitch: Scalar) -> Scalar {
        let i = interval(&LENGTH_OVER_DIAMETER, length_over_diameter);
        let j = interval(&WIRE_OVER_PITCH, wire_over_pitch);

        let tx = (length_over_diameter - LENGTH_OVER_DIAMETER[i])
            / (LENGTH_OVER_DIAMETER[i + 1] - LENGTH_OVER_DIAMETER[i]);
        let ty = (wire_over_pitch - WIRE_OVER_PITCH[j])
            / (WIRE_OVER_PITCH[j + 1] - WIRE_OVER_PITCH[j]);

        let f00 = self.grid[(j, i)];
        let f10 = self.grid[(j, i + 1)];
        let f01 = self.grid[(j + 1, i)];
        let f11 = self.grid[(j + 1, i + 1)];

        f00 * (1.0 - tx) * (1.0 - ty)
            + f10 * tx * (1.0 - ty)
            + f01 * (1.0 - tx) * ty
            + f11 * tx * ty
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn knot_values_match_reference_table() {
        let table = MedhurstTable::new();
        assert_relative_eq!(table.factor(0.0, 0.0), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(table.factor(2.0, 0.7), 2.32, epsilon = 1.0e-12);
        assert_relative_eq!(table.factor(2.0, 0.8), 2.74, epsilon = 1.0e-12);
        assert_relative_eq!(
            table.factor(INFINITE_LENGTH_RATIO, 1.0),
            3.41,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn interior_points_interpolate_bilinearly() {
        let table = MedhurstTable::new();
        // Halfway between the (2, 0.7) and (2, 0.8) knots.
        assert_relative_eq!(table.factor(2.0, 0.75), 2.53, epsilon = 1.0e-12);
        // Center of the cell spanning (1, 0.4)..(2, 0.5).
        let expected = 0.25 * (1.45 + 1.50 + 1.67 + 1.74);
        assert_relative_eq!(table.factor(1.5, 0.45), expected, epsilon = 1.0e-12);
    }

    #[test]
    fn beyond_grid_extrapolates_from_edge_cell() {
        let table = MedhurstTable::new();
        // Past the "infinite" length sentinel, the last column pair continues
        // linearly.
        let slope = (3.41 - 3.23) / (INFINITE_LENGTH_RATIO - 10.0);
        let expected = 3.41 + 5.0 * slope;
        assert_relative_eq!(table.factor(25.0, 1.0), expected, max_relative = 1.0e-12);
    }

    #[test]
    fn factor_is_at_least_one_inside_grid() {
        let table = MedhurstTable::new();
        for i in 0..=20 {
            for j in 0..=10 {
                let ld = Scalar::from(i);
                let ds = Scalar::from(j) * 0.1;
                assert!(table.factor(ld, ds) >= 1.0);
            }
        }
    }
}
