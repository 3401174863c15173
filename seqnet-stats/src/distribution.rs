//! Probability distributions and numerical kernels.
//!
//! Provides the [`Distribution`] trait with [`Normal`], [`StudentT`],
//! [`ChiSquared`], and [`FDistribution`] implementations, plus the low-level
//! special functions ([`erf`], [`ln_gamma`], [`betai`], [`gammainc`]) they are
//! built on. These exist solely to turn test statistics into p-values.

use core::f64::consts::PI;

use seqnet_core::{Result, SeqnetError};

// ── Special functions ──────────────────────────────────────────────────────

/// Error function via Abramowitz & Stegun 7.1.26 (max error ~1.5e-7).
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// Natural log of the gamma function via the Lanczos approximation (g=7).
///
/// Defined for `x > 0`; negative non-integer arguments go through the
/// reflection formula.
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 8] = [
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        // Reflection: Γ(x) = π / (sin(πx) · Γ(1-x))
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = 0.99999999999980993_f64;
        for (i, &c) in COEFFS.iter().enumerate() {
            acc += c / (x + i as f64 + 1.0);
        }
        let t = x + 7.5; // g + 0.5
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

/// Regularized incomplete beta function I_x(a, b) via the modified Lentz
/// continued fraction (max 200 iterations).
///
/// Switches to the complementary relation `I_x(a,b) = 1 - I_{1-x}(b,a)` when
/// `x > (a+1)/(a+b+2)` to keep the continued fraction convergent.
pub fn betai(a: f64, b: f64, x: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&x) {
        return Err(SeqnetError::InvalidInput(
            "betai: x must be in [0, 1]".into(),
        ));
    }
    if x == 0.0 || x == 1.0 {
        return Ok(x);
    }

    if x > (a + 1.0) / (a + b + 2.0) {
        return Ok(1.0 - betai(b, a, 1.0 - x)?);
    }

    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    let tiny = 1e-30_f64;
    let eps = 1e-10_f64;

    let mut c = 1.0_f64;
    let mut d = (1.0 - (a + b) * x / (a + 1.0)).recip();
    if d.abs() < tiny {
        d = tiny;
    }
    let mut h = d;

    for m in 1..=200 {
        let m = m as f64;

        // Even continuant
        let coef = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 + coef * d;
        if d.abs() < tiny {
            d = tiny;
        }
        d = d.recip();
        c = 1.0 + coef / c;
        if c.abs() < tiny {
            c = tiny;
        }
        h *= d * c;

        // Odd continuant
        let coef = -((a + m) * (a + b + m) * x) / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 + coef * d;
        if d.abs() < tiny {
            d = tiny;
        }
        d = d.recip();
        c = 1.0 + coef / c;
        if c.abs() < tiny {
            c = tiny;
        }
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < eps {
            break;
        }
    }

    Ok(front * h / a)
}

/// Regularized lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// Uses the series expansion when `x < a + 1` and the continued fraction for
/// the upper function (then P = 1 - Q) otherwise.
pub fn gammainc(a: f64, x: f64) -> Result<f64> {
    if a <= 0.0 {
        return Err(SeqnetError::InvalidInput(
            "gammainc: a must be positive".into(),
        ));
    }
    if x < 0.0 {
        return Err(SeqnetError::InvalidInput(
            "gammainc: x must be non-negative".into(),
        ));
    }
    if x == 0.0 {
        return Ok(0.0);
    }

    if x < a + 1.0 {
        Ok(gammainc_series(a, x))
    } else {
        Ok(1.0 - gammainc_cf(a, x))
    }
}

/// Series expansion for P(a, x).
fn gammainc_series(a: f64, x: f64) -> f64 {
    let eps = 1e-12;
    let ln_front = a * x.ln() - x - ln_gamma(a);

    let mut term = 1.0 / a;
    let mut sum = term;
    for n in 1..=200 {
        term *= x / (a + n as f64);
        sum += term;
        if term.abs() < sum.abs() * eps {
            break;
        }
    }
    sum * ln_front.exp()
}

/// Continued fraction for Q(a, x) = 1 - P(a, x) via modified Lentz's method.
fn gammainc_cf(a: f64, x: f64) -> f64 {
    let eps = 1e-12;
    let tiny = 1e-30_f64;
    let ln_front = a * x.ln() - x - ln_gamma(a);

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=200 {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < eps {
            break;
        }
    }

    h * ln_front.exp()
}

// ── Distribution trait ─────────────────────────────────────────────────────

/// A probability distribution with basic statistical properties.
pub trait Distribution {
    /// Probability density function at `x`.
    fn pdf(&self, x: f64) -> f64;

    /// Cumulative distribution function at `x`.
    fn cdf(&self, x: f64) -> f64;

    /// Distribution mean.
    fn mean(&self) -> f64;

    /// Distribution variance.
    fn variance(&self) -> f64;

    /// Distribution standard deviation (default: sqrt of variance).
    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

// ── Normal distribution ────────────────────────────────────────────────────

/// Normal (Gaussian) distribution with parameters μ and σ.
#[derive(Debug, Clone, Copy)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Create a new Normal distribution. `sigma` must be positive.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if sigma <= 0.0 {
            return Err(SeqnetError::InvalidInput(
                "Normal: sigma must be positive".into(),
            ));
        }
        Ok(Self { mu, sigma })
    }

    /// Standard normal distribution N(0, 1).
    pub fn standard() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
        }
    }
}

impl Distribution for Normal {
    fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        0.5 * (1.0 + erf(z / core::f64::consts::SQRT_2))
    }

    fn mean(&self) -> f64 {
        self.mu
    }

    fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }
}

// ── Student's t-distribution ───────────────────────────────────────────────

/// Student's t-distribution with ν degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct StudentT {
    nu: f64,
}

impl StudentT {
    /// Create a t-distribution with `nu` degrees of freedom.
    pub fn new(nu: f64) -> Result<Self> {
        if nu <= 0.0 {
            return Err(SeqnetError::InvalidInput(
                "StudentT: nu must be positive".into(),
            ));
        }
        Ok(Self { nu })
    }

    /// Degrees of freedom.
    pub fn df(&self) -> f64 {
        self.nu
    }
}

impl Distribution for StudentT {
    fn pdf(&self, x: f64) -> f64 {
        let nu = self.nu;
        let ln_pdf = ln_gamma((nu + 1.0) / 2.0)
            - ln_gamma(nu / 2.0)
            - 0.5 * (nu * PI).ln()
            - 0.5 * (nu + 1.0) * (1.0 + x * x / nu).ln();
        ln_pdf.exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        // I_{ν/(ν+t²)}(ν/2, 1/2) is the two-tailed mass beyond |t|.
        let ix = self.nu / (self.nu + x * x);
        let tail = 0.5 * betai(self.nu / 2.0, 0.5, ix).unwrap_or(1.0);
        if x >= 0.0 {
            1.0 - tail
        } else {
            tail
        }
    }

    fn mean(&self) -> f64 {
        if self.nu > 1.0 {
            0.0
        } else {
            f64::NAN
        }
    }

    fn variance(&self) -> f64 {
        if self.nu > 2.0 {
            self.nu / (self.nu - 2.0)
        } else {
            f64::INFINITY
        }
    }
}

// ── Chi-squared distribution ───────────────────────────────────────────────

/// Chi-squared distribution with k degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct ChiSquared {
    k: f64,
}

impl ChiSquared {
    /// Create a chi-squared distribution with `k` degrees of freedom.
    pub fn new(k: f64) -> Result<Self> {
        if k <= 0.0 {
            return Err(SeqnetError::InvalidInput(
                "ChiSquared: k must be positive".into(),
            ));
        }
        Ok(Self { k })
    }

    /// Degrees of freedom.
    pub fn df(&self) -> f64 {
        self.k
    }
}

impl Distribution for ChiSquared {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let half_k = self.k / 2.0;
        let ln_pdf =
            (half_k - 1.0) * x.ln() - x / 2.0 - half_k * 2.0_f64.ln() - ln_gamma(half_k);
        ln_pdf.exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        gammainc(self.k / 2.0, x / 2.0).unwrap_or(0.0)
    }

    fn mean(&self) -> f64 {
        self.k
    }

    fn variance(&self) -> f64 {
        2.0 * self.k
    }
}

// ── F-distribution ─────────────────────────────────────────────────────────

/// F-distribution with d1 and d2 degrees of freedom.
#[derive(Debug, Clone, Copy)]
pub struct FDistribution {
    d1: f64,
    d2: f64,
}

impl FDistribution {
    /// Create an F-distribution with `d1` and `d2` degrees of freedom.
    pub fn new(d1: f64, d2: f64) -> Result<Self> {
        if d1 <= 0.0 || d2 <= 0.0 {
            return Err(SeqnetError::InvalidInput(
                "FDistribution: both d1 and d2 must be positive".into(),
            ));
        }
        Ok(Self { d1, d2 })
    }
}

impl Distribution for FDistribution {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let (d1, d2) = (self.d1, self.d2);
        let ln_pdf = 0.5 * d1 * (d1 * x / (d1 * x + d2)).ln()
            + 0.5 * d2 * (d2 / (d1 * x + d2)).ln()
            - x.ln()
            - ln_gamma(d1 / 2.0)
            - ln_gamma(d2 / 2.0)
            + ln_gamma((d1 + d2) / 2.0);
        ln_pdf.exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let ix = self.d1 * x / (self.d1 * x + self.d2);
        betai(self.d1 / 2.0, self.d2 / 2.0, ix).unwrap_or(0.0)
    }

    fn mean(&self) -> f64 {
        if self.d2 > 2.0 {
            self.d2 / (self.d2 - 2.0)
        } else {
            f64::INFINITY
        }
    }

    fn variance(&self) -> f64 {
        if self.d2 > 4.0 {
            let (d1, d2) = (self.d1, self.d2);
            2.0 * d2 * d2 * (d1 + d2 - 2.0) / (d1 * (d2 - 2.0).powi(2) * (d2 - 4.0))
        } else {
            f64::INFINITY
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn erf_zero_and_symmetry() {
        assert!(erf(0.0).abs() < TOL);
        assert!((erf(-0.7) + erf(0.7)).abs() < TOL);
        assert!((erf(1.0) - 0.8427007929).abs() < 1e-5);
    }

    #[test]
    fn ln_gamma_factorials() {
        assert!((ln_gamma(1.0)).abs() < TOL); // 0! = 1
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < TOL); // 4! = 24
        assert!((ln_gamma(0.5) - 0.5 * PI.ln()).abs() < 1e-5); // Γ(1/2) = √π
    }

    #[test]
    fn betai_uniform_is_identity() {
        // Beta(1,1) is uniform, so I_x(1,1) = x
        assert!((betai(1.0, 1.0, 0.25).unwrap() - 0.25).abs() < TOL);
        assert_eq!(betai(2.0, 3.0, 0.0).unwrap(), 0.0);
        assert_eq!(betai(2.0, 3.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn betai_complementary_relation() {
        let lhs = betai(2.0, 3.0, 0.4).unwrap();
        let rhs = 1.0 - betai(3.0, 2.0, 0.6).unwrap();
        assert!((lhs - rhs).abs() < TOL);
    }

    #[test]
    fn betai_out_of_domain() {
        assert!(betai(1.0, 1.0, -0.1).is_err());
        assert!(betai(1.0, 1.0, 1.1).is_err());
    }

    #[test]
    fn gammainc_exponential_case() {
        // P(1, x) = 1 - e^{-x}
        let x: f64 = 2.0;
        assert!((gammainc(1.0, x).unwrap() - (1.0 - (-x).exp())).abs() < 1e-8);
    }

    #[test]
    fn gammainc_half_is_erf() {
        let x: f64 = 1.3;
        assert!((gammainc(0.5, x).unwrap() - erf(x.sqrt())).abs() < 1e-6);
    }

    #[test]
    fn gammainc_saturates() {
        assert!((gammainc(2.0, 60.0).unwrap() - 1.0).abs() < 1e-10);
        assert_eq!(gammainc(2.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn gammainc_out_of_domain() {
        assert!(gammainc(-1.0, 1.0).is_err());
        assert!(gammainc(1.0, -1.0).is_err());
    }

    #[test]
    fn normal_cdf_reference() {
        let n = Normal::standard();
        assert!((n.cdf(0.0) - 0.5).abs() < TOL);
        assert!((n.cdf(1.0) - 0.8413447).abs() < 1e-5);
        assert!((n.cdf(-1.96) - 0.0249979).abs() < 1e-4);
    }

    #[test]
    fn student_t_cdf_reference() {
        // t(10) at 2.228 ≈ 0.975 (two-tailed 0.05 critical value)
        let t = StudentT::new(10.0).unwrap();
        assert!((t.cdf(2.228) - 0.975).abs() < 1e-3);
        assert!((t.cdf(0.0) - 0.5).abs() < TOL);
        // Symmetry
        assert!((t.cdf(-1.5) - (1.0 - t.cdf(1.5))).abs() < TOL);
    }

    #[test]
    fn student_t_large_df_approaches_normal() {
        let t = StudentT::new(1000.0).unwrap();
        let n = Normal::standard();
        assert!((t.cdf(1.0) - n.cdf(1.0)).abs() < 1e-3);
    }

    #[test]
    fn chi_squared_cdf_reference() {
        let chi2 = ChiSquared::new(2.0).unwrap();
        // χ²(2) at 5.991 ≈ p=0.95
        assert!((chi2.cdf(5.991) - 0.95).abs() < 0.01);
        assert_eq!(chi2.cdf(0.0), 0.0);
    }

    #[test]
    fn f_cdf_reference() {
        let f = FDistribution::new(5.0, 10.0).unwrap();
        // F(5,10) at 3.326 ≈ 0.95
        assert!((f.cdf(3.326) - 0.95).abs() < 0.02);
        assert_eq!(f.cdf(0.0), 0.0);
    }

    #[test]
    fn invalid_parameters() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(StudentT::new(0.0).is_err());
        assert!(ChiSquared::new(-1.0).is_err());
        assert!(FDistribution::new(1.0, 0.0).is_err());
    }
}
