//! Shared numerical primitives: modified Bessel functions, scalar root
//! finding, and bounded scalar minimization.
//!
//! The Bessel approximations follow Abramowitz & Stegun, *Handbook of
//! Mathematical Functions*, §9.8 (polynomial fits accurate to roughly 1e-7
//! absolute error, ample for the semi-empirical coil model built on top).

/// Primary scalar type used across the crate.
pub type Scalar = f64;

/// Modified Bessel function of the first kind, order 0.
#[must_use]
pub fn bessel_i0(x: Scalar) -> Scalar {
    let ax = x.abs();
    if ax < 3.75 {
        // A&S 9.8.1, polynomial in (x/3.75)^2
        let t = (x / 3.75).powi(2);
        1.0 + t
            * (3.515_622_9
                + t * (3.089_942_4
                    + t * (1.206_749_2
                        + t * (0.265_973_2 + t * (0.036_076_8 + t * 0.004_581_3)))))
    } else {
        // A&S 9.8.2, asymptotic form
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.398_942_28
                + t * (0.013_285_92
                    + t * (0.002_253_19
                        + t * (-0.001_575_65
                            + t * (0.009_162_81
                                + t * (-0.020_577_06
                                    + t * (0.026_355_37
                                        + t * (-0.016_476_33 + t * 0.003_923_77))))))))
    }
}

/// Modified Bessel function of the first kind, order 1.
#[must_use]
pub fn bessel_i1(x: Scalar) -> Scalar {
    let ax = x.abs();
    let out = if ax < 3.75 {
        // A&S 9.8.3
        let t = (x / 3.75).powi(2);
        ax * (0.5
            + t * (0.878_905_94
                + t * (0.514_988_69
                    + t * (0.150_849_34
                        + t * (0.026_587_33 + t * (0.003_015_32 + t * 0.000_324_11))))))
    } else {
        // A&S 9.8.4
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.398_942_28
                + t * (-0.039_880_24
                    + t * (-0.003_620_18
                        + t * (0.001_638_01
                            + t * (-0.010_315_55
                                + t * (0.022_829_67
                                    + t * (-0.028_953_12
                                        + t * (0.017_876_54 + t * -0.004_200_59))))))))
    };
    if x < 0.0 {
        -out
    } else {
        out
    }
}

/// Modified Bessel function of the second kind, order 0. Requires `x > 0`.
#[must_use]
pub fn bessel_k0(x: Scalar) -> Scalar {
    if x <= 2.0 {
        // A&S 9.8.5
        let t = x * x / 4.0;
        -(x / 2.0).ln() * bessel_i0(x)
            + (-0.577_215_66
                + t * (0.422_784_20
                    + t * (0.230_697_56
                        + t * (0.034_885_90
                            + t * (0.002_626_98 + t * (0.000_107_50 + t * 0.000_007_40))))))
    } else {
        // A&S 9.8.6
        let t = 2.0 / x;
        ((-x).exp() / x.sqrt())
            * (1.253_314_14
                + t * (-0.078_323_58
                    + t * (0.021_895_68
                        + t * (-0.010_624_46
                            + t * (0.005_878_72 + t * (-0.002_515_40 + t * 0.000_532_08))))))
    }
}

/// Modified Bessel function of the second kind, order 1. Requires `x > 0`.
#[must_use]
pub fn bessel_k1(x: Scalar) -> Scalar {
    if x <= 2.0 {
        // A&S 9.8.7
        let t = x * x / 4.0;
        (x / 2.0).ln() * bessel_i1(x)
            + (1.0 / x)
                * (1.0
                    + t * (0.154_431_44
                        + t * (-0.672_785_79
                            + t * (-0.181_568_97
                                + t * (-0.019_194_02
                                    + t * (-0.001_104_04 + t * -0.000_046_86))))))
    } else {
        // A&S 9.8.8
        let t = 2.0 / x;
        ((-x).exp() / x.sqrt())
            * (1.253_314_14
                + t * (0.234_986_19
                    + t * (-0.036_556_20
                        + t * (0.015_042_68
                            + t * (-0.007_803_53 + t * (0.003_256_14 + t * -0.000_682_45))))))
    }
}

const ROOT_MAX_ITER: usize = 100;
const ROOT_RTOL: Scalar = 1e-12;

/// Finds a root of `f` near `x0` using the secant method (the derivative-free
/// Newton variant). The second starting point is formed by a small relative
/// perturbation of `x0`.
///
/// # Errors
///
/// Returns [`crate::errors::CoilError::Convergence`] when the iteration stalls
/// on a flat secant or the iteration budget is exhausted.
pub fn find_root_secant<F>(mut f: F, x0: Scalar) -> Result<Scalar, crate::errors::CoilError>
where
    F: FnMut(Scalar) -> Scalar,
{
    let eps = 1e-4;
    let mut x0 = x0;
    let mut x1 = if x0 >= 0.0 {
        x0 * (1.0 + eps) + eps
    } else {
        x0 * (1.0 + eps) - eps
    };
    let mut f0 = f(x0);
    let mut f1 = f(x1);
    if f1.abs() < f0.abs() {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut f0, &mut f1);
    }

    for _ in 0..ROOT_MAX_ITER {
        if f1 == f0 {
            return Err(crate::errors::CoilError::Convergence(
                "secant iteration stalled on a flat function".into(),
            ));
        }
        let x2 = x1 - f1 * (x1 - x0) / (f1 - f0);
        if (x2 - x1).abs() <= ROOT_RTOL * x2.abs().max(1.0) {
            return Ok(x2);
        }
        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f(x1);
        if !f1.is_finite() {
            return Err(crate::errors::CoilError::Convergence(
                "secant iterate left the function domain".into(),
            ));
        }
    }

    Err(crate::errors::CoilError::Convergence(format!(
        "no root found near {x1:.6e} after {ROOT_MAX_ITER} iterations"
    )))
}

const MIN_MAX_ITER: usize = 500;
const MIN_XTOL: Scalar = 1e-10;

/// Minimizes `f` over the closed bracket `[lo, hi]` by golden-section search.
///
/// Never fails: returns the best `(x, f(x))` pair found in-bracket once the
/// bracket has shrunk below a relative width tolerance or the iteration
/// budget runs out. Callers needing a true minimum must check `f(x)`
/// themselves.
#[must_use]
pub fn minimize_scalar_bounded<F>(mut f: F, lo: Scalar, hi: Scalar) -> (Scalar, Scalar)
where
    F: FnMut(Scalar) -> Scalar,
{
    // inverse golden ratio
    let invphi = (Scalar::sqrt(5.0) - 1.0) / 2.0;

    let mut a = lo;
    let mut b = hi;
    let mut c = b - invphi * (b - a);
    let mut d = a + invphi * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..MIN_MAX_ITER {
        if (b - a) <= MIN_XTOL * 0.5 * (a.abs() + b.abs()) {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - invphi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + invphi * (b - a);
            fd = f(d);
        }
    }

    if fc < fd {
        (c, fc)
    } else {
        (d, fd)
    }
}

/// Three-point central-difference estimate of `df/dx` at `x` with step `dx`.
#[must_use]
pub fn central_difference<F>(mut f: F, x: Scalar, dx: Scalar) -> Scalar
where
    F: FnMut(Scalar) -> Scalar,
{
    (f(x + dx) - f(x - dx)) / (2.0 * dx)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bessel_small_arguments_match_tables() {
        // A&S table 9.8 / 9.11 values.
        assert_relative_eq!(bessel_i0(0.0), 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(bessel_i0(1.0), 1.266_065_878, max_relative = 1.0e-6);
        assert_relative_eq!(bessel_i1(1.0), 0.565_159_104, max_relative = 1.0e-6);
        assert_relative_eq!(bessel_k0(1.0), 0.421_024_438, max_relative = 1.0e-6);
        assert_relative_eq!(bessel_k1(1.0), 0.601_907_230, max_relative = 1.0e-6);
    }

    #[test]
    fn bessel_large_arguments_match_tables() {
        assert_relative_eq!(bessel_i0(5.0), 27.239_871_824, max_relative = 1.0e-6);
        assert_relative_eq!(bessel_i1(5.0), 24.335_642_142, max_relative = 1.0e-6);
        assert_relative_eq!(bessel_k0(5.0), 3.691_098_989e-3, max_relative = 1.0e-5);
        assert_relative_eq!(bessel_k1(5.0), 4.044_613_445e-3, max_relative = 1.0e-5);
    }

    #[test]
    fn bessel_i1_is_odd() {
        assert_relative_eq!(bessel_i1(-2.0), -bessel_i1(2.0), epsilon = 1.0e-12);
    }

    #[test]
    fn wronskian_identity_holds() {
        // I1(x) K0(x) + I0(x) K1(x) = 1/x
        for &x in &[0.1, 0.5, 1.0, 2.0, 4.0, 8.0] {
            let w = bessel_i1(x) * bessel_k0(x) + bessel_i0(x) * bessel_k1(x);
            assert_relative_eq!(w, 1.0 / x, max_relative = 1.0e-5);
        }
    }

    #[test]
    fn secant_finds_simple_root() {
        let root = find_root_secant(|x| x * x - 2.0, 1.0).expect("root");
        assert_relative_eq!(root, Scalar::sqrt(2.0), max_relative = 1.0e-10);
    }

    #[test]
    fn secant_reports_flat_function() {
        assert!(find_root_secant(|_| 1.0, 1.0).is_err());
    }

    #[test]
    fn golden_section_locates_parabola_minimum() {
        let (x, fx) = minimize_scalar_bounded(|x| (x - 3.0).powi(2) + 1.0, 0.0, 10.0);
        assert_relative_eq!(x, 3.0, max_relative = 1.0e-6);
        assert_relative_eq!(fx, 1.0, max_relative = 1.0e-9);
    }

    #[test]
    fn golden_section_converges_to_boundary_minimum() {
        // Monotone decreasing on the bracket: minimum sits at the upper bound.
        let (x, _) = minimize_scalar_bounded(|x| -x, 0.0, 1.0);
        assert_relative_eq!(x, 1.0, max_relative = 1.0e-6);
    }

    #[test]
    fn central_difference_matches_analytic_derivative() {
        let d = central_difference(|x| x.powi(3), 2.0, 1.0e-4);
        assert_relative_eq!(d, 12.0, max_relative = 1.0e-6);
    }
}
