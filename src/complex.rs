use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::error::ComplexError;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Complex { re, im }
    }
}

/// Relative and absolute epsilon for approximate comparisons.
///
/// Two floats are close when `|a - b| <= max(rel * max(|a|, |b|), abs)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance {
    pub rel: f64,
    pub abs: f64,
}

impl Tolerance {
    pub const fn new(rel: f64, abs: f64) -> Self {
        Tolerance { rel, abs }
    }

    pub fn close(self, a: f64, b: f64) -> bool {
        if a == b {
            // covers equal infinities
            return true;
        }
        if !a.is_finite() || !b.is_finite() {
            return false;
        }
        let diff = (a - b).abs();
        diff <= (self.rel * a.abs().max(b.abs())).max(self.abs)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::new(1e-9, 0.0)
    }
}

/// Wraps an angle into the principal range `(-π, π]`.
fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

impl Complex<f64> {
    pub const ZERO: Self = Complex::new(0.0, 0.0);
    pub const ONE: Self = Complex::new(1.0, 0.0);

    // r*e^(i*theta)
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Complex::new(r * theta.cos(), r * theta.sin())
    }

    /// Magnitude, computed with `hypot` so large components don't overflow.
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Principal argument in `(-π, π]`. The argument of zero is `0`.
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn to_polar(self) -> (f64, f64) {
        (self.norm(), self.arg())
    }

    pub fn conj(self) -> Self {
        Complex::new(self.re, -self.im)
    }

    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// Raises to an integer power through polar form.
    ///
    /// `z^0` is `1` for every `z`, zero included. A negative exponent yields
    /// the reciprocal magnitude and negated angle of `z^|n|`, computed in a
    /// single pass as `r^n` and `θ·n`.
    pub fn powi(self, n: i32) -> Result<Self, ComplexError> {
        if n == 0 {
            return Ok(Complex::ONE);
        }
        if n < 0 && self.is_zero() {
            return Err(ComplexError::DivisionByZero);
        }
        let (r, theta) = self.to_polar();
        let magnitude = r.powi(n);
        if !magnitude.is_finite() {
            return Err(ComplexError::Overflow);
        }
        Complex::from_polar(magnitude, wrap_angle(theta * n as f64)).finite()
    }

    /// All `n`-th roots, ordered by generating index `k` in `0..n`.
    ///
    /// Root `k` has magnitude `r^(1/n)` and angle `(θ + 2πk) / n`, where `θ`
    /// is the principal argument, so the first root is the principal root.
    pub fn roots(self, n: i32) -> Result<Vec<Self>, ComplexError> {
        if n <= 0 {
            return Err(ComplexError::InvalidRootDegree { degree: n });
        }
        let degree = n as f64;
        let theta = self.arg();
        // r^(1/n) taken as s^(1/n) * (r/s)^(1/n), since r itself may overflow
        let scale = self.re.abs().max(self.im.abs());
        let magnitude = if scale == 0.0 {
            0.0
        } else {
            let rest = (self.re / scale).hypot(self.im / scale);
            scale.powf(degree.recip()) * rest.powf(degree.recip())
        };
        if !magnitude.is_finite() {
            return Err(ComplexError::Overflow);
        }

        (0..n)
            .map(|k| Complex::from_polar(magnitude, (theta + TAU * k as f64) / degree).finite())
            .collect()
    }

    /// Division via the conjugate of the divisor.
    ///
    /// The divisor is first scaled by its largest component so that
    /// `c² + d²` lies in `[1, 2]` and cannot underflow or overflow.
    pub fn try_div(self, rhs: Self) -> Result<Self, ComplexError> {
        if rhs.is_zero() {
            return Err(ComplexError::DivisionByZero);
        }
        let scale = rhs.re.abs().max(rhs.im.abs());
        let (c, d) = (rhs.re / scale, rhs.im / scale);
        let denom = (c * c + d * d) * scale;
        Complex::new(
            (self.re * c + self.im * d) / denom,
            (self.im * c - self.re * d) / denom,
        )
        .finite()
    }

    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    fn finite(self) -> Result<Self, ComplexError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(ComplexError::Overflow)
        }
    }

    /// Componentwise approximate equality.
    pub fn approx_eq(self, other: Self, tol: Tolerance) -> bool {
        tol.close(self.re, other.re) && tol.close(self.im, other.im)
    }
}

impl Default for Complex<f64> {
    fn default() -> Self {
        Complex::ONE
    }
}

impl<T> std::ops::Mul for Complex<T>
where
    T: std::ops::Mul<Output = T> + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + Copy,
{
    type Output = Complex<T>;

    fn mul(self, rhs: Self) -> Self {
        Complex {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}
impl<T> std::ops::Add for Complex<T>
where
    T: std::ops::Add<Output = T>,
{
    type Output = Complex<T>;

    fn add(self, rhs: Self) -> Self {
        Complex {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}
impl<T> std::ops::Sub for Complex<T>
where
    T: std::ops::Sub<Output = T>,
{
    type Output = Complex<T>;

    fn sub(self, rhs: Self) -> Self {
        Complex {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}
impl<T> std::ops::Neg for Complex<T>
where
    T: std::ops::Neg<Output = T>,
{
    type Output = Complex<T>;

    fn neg(self) -> Self {
        Complex {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl From<f64> for Complex<f64> {
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl<T> From<num_complex::Complex<T>> for Complex<T> {
    fn from(z: num_complex::Complex<T>) -> Self {
        Complex::new(z.re, z.im)
    }
}

impl<T> From<Complex<T>> for num_complex::Complex<T> {
    fn from(z: Complex<T>) -> Self {
        num_complex::Complex::new(z.re, z.im)
    }
}

impl fmt::Display for Complex<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 counts as non-negative, so it prints as "+ 0i"
        let sign = if self.im >= 0.0 { '+' } else { '-' };
        write!(f, "{} {} {}i", self.re, sign, self.im.abs())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use num_complex::ComplexDistribution;
    use rand::{rngs::StdRng, SeedableRng};
    use rand_distr::{Distribution, StandardNormal};

    use super::*;

    const TOL: Tolerance = Tolerance::new(1e-9, 1e-12);

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn samples(seed: u64, n: usize) -> Vec<Complex<f64>> {
        let dist = ComplexDistribution::new(StandardNormal, StandardNormal);
        let mut rng = StdRng::seed_from_u64(seed);
        dist.sample_iter(&mut rng)
            .take(n)
            .map(|z: num_complex::Complex<f64>| Complex::from(z) * c(10.0, 0.0))
            .collect()
    }

    #[test]
    fn default_is_one() {
        assert_eq!(Complex::default(), c(1.0, 0.0));
        assert_eq!(Complex::default(), Complex::<f64>::from(1.0));
    }

    #[test]
    fn three_four_five() {
        let z = c(3.0, 4.0);
        assert_eq!(z.norm(), 5.0);
        assert!((z.arg() - 0.9273).abs() < 1e-4);
        assert_eq!(z.conj(), c(3.0, -4.0));
    }

    #[test]
    fn norm_does_not_overflow() {
        let z = c(1e300, 1e300);
        assert!(z.norm().is_finite());
        assert!(TOL.close(z.norm(), 1e300 * 2f64.sqrt()));
    }

    #[test]
    fn arg_range() {
        assert_eq!(c(0.0, 0.0).arg(), 0.0);
        assert_eq!(c(-1.0, 0.0).arg(), PI);
        assert!(TOL.close(c(0.0, -1.0).arg(), -FRAC_PI_2));
        for z in samples(1, 200) {
            let arg = z.arg();
            assert!(arg > -PI && arg <= PI, "{arg}");
        }
    }

    #[test]
    fn arithmetic() {
        let z1 = c(1.0, 2.0);
        let z2 = c(3.0, -1.0);
        assert_eq!(z1 + z2, c(4.0, 1.0));
        assert_eq!(z1 - z2, c(-2.0, 3.0));
        assert_eq!(z1 * z2, c(5.0, 5.0));
        assert!(z1.try_div(z2).unwrap().approx_eq(c(0.1, 0.7), TOL));
        assert_eq!(-z1, c(-1.0, -2.0));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(c(1.0, 1.0).try_div(Complex::ZERO), Err(ComplexError::DivisionByZero));
        assert_eq!(Complex::ZERO.powi(-3), Err(ComplexError::DivisionByZero));
    }

    #[test]
    fn powi_overflow() {
        assert_eq!(c(10.0, 0.0).powi(400), Err(ComplexError::Overflow));
        assert_eq!(c(1e-200, 0.0).powi(-2), Err(ComplexError::Overflow));
        assert_eq!(c(3.0, 4.0).powi(i32::MAX), Err(ComplexError::Overflow));

        // underflow towards zero stays finite
        let tiny = c(1e-200, 1e-200).powi(3).unwrap();
        assert!(tiny.is_finite());
        assert!(c(10.0, 0.0).powi(-400).unwrap().is_finite());
    }

    #[test]
    fn div_and_negative_power_agree_on_tiny_values() {
        let tiny: Complex<f64> = Complex::from(1e-200);
        let by_div = Complex::ONE.try_div(tiny).unwrap();
        let by_pow = tiny.powi(-1).unwrap();
        assert!(by_div.approx_eq(c(1e200, 0.0), TOL));
        assert!(by_div.approx_eq(by_pow, TOL));

        let z = c(3e-170, -4e-170);
        assert!(Complex::ONE
            .try_div(z)
            .unwrap()
            .approx_eq(z.powi(-1).unwrap(), Tolerance::new(1e-12, 0.0)));
    }

    #[test]
    fn div_of_huge_values() {
        let huge = c(1e200, 0.0);
        assert!(huge.try_div(huge).unwrap().approx_eq(Complex::ONE, TOL));

        let z = c(1e300, 1e300);
        assert!(z.try_div(z.conj()).unwrap().approx_eq(c(0.0, 1.0), TOL));

        assert_eq!(
            c(1e300, 0.0).try_div(c(1e-300, 0.0)),
            Err(ComplexError::Overflow)
        );
    }

    #[test]
    fn roots_stay_finite() {
        let z = c(f64::MAX, f64::MAX);
        for root in z.roots(5).unwrap() {
            assert!(root.is_finite(), "{root}");
        }
        for root in c(1e-300, 0.0).roots(3).unwrap() {
            assert!(root.is_finite());
            assert!(TOL.close(root.norm(), 1e-100));
        }
    }

    #[test]
    fn zero_power() {
        assert_eq!(Complex::ZERO.powi(0), Ok(c(1.0, 0.0)));
        assert_eq!(c(-7.5, 2.0).powi(0), Ok(c(1.0, 0.0)));
        assert_eq!(Complex::ZERO.powi(3), Ok(Complex::ZERO));
    }

    #[test]
    fn small_powers() {
        let i = c(0.0, 1.0);
        assert!(i.powi(2).unwrap().approx_eq(c(-1.0, 0.0), TOL));
        assert!(i.powi(-1).unwrap().approx_eq(c(0.0, -1.0), TOL));
        assert!(c(1.0, 1.0).powi(-2).unwrap().approx_eq(c(0.0, -0.5), TOL));
        assert!(c(1.0, 2.0).powi(3).unwrap().approx_eq(c(-11.0, -2.0), TOL));
    }

    #[test]
    fn powi_matches_num_complex() {
        for z in samples(2, 100) {
            for n in [-5, -2, -1, 1, 2, 3, 7] {
                let ours = z.powi(n).unwrap();
                let theirs: Complex<f64> = num_complex::Complex::from(z).powi(n).into();
                let tol = Tolerance::new(1e-9, 1e-9 * theirs.norm().max(1.0));
                assert!(ours.approx_eq(theirs, tol), "{z} ^ {n}: {ours} vs {theirs}");
            }
        }
    }

    #[test]
    fn negative_power_consistency() {
        for z in samples(3, 100) {
            for n in 1..6 {
                let lhs = z.powi(n).unwrap().powi(-1).unwrap();
                let rhs = z.powi(-n).unwrap();
                let tol = Tolerance::new(1e-9, 1e-12 * rhs.norm().max(1.0));
                assert!(lhs.approx_eq(rhs, tol), "{z}, {n}: {lhs} vs {rhs}");
                assert!(lhs.approx_eq(Complex::ONE.try_div(z.powi(n).unwrap()).unwrap(), tol));
            }
        }
    }

    #[test]
    fn roots_of_unity() {
        let roots = Complex::ONE.roots(4).unwrap();
        let expected = [c(1.0, 0.0), c(0.0, 1.0), c(-1.0, 0.0), c(0.0, -1.0)];
        assert_eq!(roots.len(), 4);
        for (root, want) in roots.iter().zip(expected) {
            assert!(root.approx_eq(want, TOL), "{root} vs {want}");
        }
    }

    #[test]
    fn roots_power_back() {
        for z in samples(4, 50) {
            for n in 1..8 {
                let roots = z.roots(n).unwrap();
                assert_eq!(roots.len(), n as usize);
                let tol = Tolerance::new(1e-9, 1e-9 * z.norm().max(1.0));
                for w in roots {
                    assert!(w.powi(n).unwrap().approx_eq(z, tol), "{w} ^ {n} vs {z}");
                }
            }
        }
    }

    #[test]
    fn roots_of_zero() {
        let roots = Complex::ZERO.roots(3).unwrap();
        assert_eq!(roots, vec![Complex::ZERO; 3]);
    }

    #[test]
    fn invalid_root_degree() {
        assert_eq!(
            c(1.0, 1.0).roots(0),
            Err(ComplexError::InvalidRootDegree { degree: 0 })
        );
        assert_eq!(
            c(1.0, 1.0).roots(-2),
            Err(ComplexError::InvalidRootDegree { degree: -2 })
        );
    }

    #[test]
    fn conj_involution() {
        for z in samples(5, 100) {
            assert!(z.conj().conj().approx_eq(z, TOL));
        }
    }

    #[test]
    fn mul_div_inverse() {
        let zs = samples(6, 100);
        for pair in zs.chunks_exact(2) {
            let (z1, z2) = (pair[0], pair[1]);
            assert!((z1 * z2).try_div(z2).unwrap().approx_eq(z1, TOL));
        }
    }

    #[test]
    fn tolerance_boundaries() {
        let tol = Tolerance::new(1e-3, 0.0);
        assert!(tol.close(1000.0, 1000.9));
        assert!(!tol.close(1000.0, 1001.1));
        assert!(!tol.close(0.0, 1e-300));

        let tol = Tolerance::new(0.0, 0.5);
        assert!(tol.close(0.0, 0.5));
        assert!(!tol.close(0.0, 0.6));

        assert!(Tolerance::default().close(f64::INFINITY, f64::INFINITY));
        assert!(!Tolerance::default().close(f64::NAN, f64::NAN));
    }

    #[test]
    fn approx_eq_is_componentwise() {
        let tol = Tolerance::new(0.0, 0.1);
        assert!(c(1.0, 1.0).approx_eq(c(1.05, 0.95), tol));
        assert!(!c(1.0, 1.0).approx_eq(c(1.05, 1.2), tol));
    }

    #[test]
    fn wrap_angle_range() {
        assert_eq!(wrap_angle(PI), PI);
        assert!(TOL.close(wrap_angle(-PI), PI));
        assert!(TOL.close(wrap_angle(3.0 * PI / 2.0), -FRAC_PI_2));
        assert!(TOL.close(wrap_angle(5.0 * TAU + 0.25), 0.25));
    }

    #[test]
    fn display() {
        assert_eq!(c(2.0, -3.0).to_string(), "2 - 3i");
        assert_eq!(c(2.0, 3.0).to_string(), "2 + 3i");
        assert_eq!(c(0.5, -0.0).to_string(), "0.5 + 0i");
        assert_eq!(c(-1.25, 0.1).to_string(), "-1.25 + 0.1i");
    }
}
