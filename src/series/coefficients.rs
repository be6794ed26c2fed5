use std::f64::consts::PI;

use crate::{
    foundation::{
        domain::Domain,
        error::{FourierError, FourierResult},
    },
    numeric::quadrature::{QuadratureOpts, integrate},
    target::piecewise::TargetFunction,
};

/// Constant term and harmonic coefficients of a truncated Fourier series.
///
/// `a_n[k]` and `b_n[k]` hold the coefficients of harmonic `k + 1`; both sequences always
/// have the same length, the degree of the set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCoefficients")]
pub struct CoefficientSet {
    a0: f64,
    a_n: Vec<f64>,
    b_n: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawCoefficients {
    a0: f64,
    a_n: Vec<f64>,
    b_n: Vec<f64>,
}

impl TryFrom<RawCoefficients> for CoefficientSet {
    type Error = FourierError;

    fn try_from(raw: RawCoefficients) -> FourierResult<Self> {
        Self::new(raw.a0, raw.a_n, raw.b_n)
    }
}

impl CoefficientSet {
    pub fn new(a0: f64, a_n: Vec<f64>, b_n: Vec<f64>) -> FourierResult<Self> {
        if a_n.len() != b_n.len() {
            return Err(FourierError::validation(format!(
                "CoefficientSet needs as many a_n as b_n (got {} and {})",
                a_n.len(),
                b_n.len()
            )));
        }
        Ok(Self { a0, a_n, b_n })
    }

    pub fn a0(&self) -> f64 {
        self.a0
    }

    pub fn a_n(&self) -> &[f64] {
        &self.a_n
    }

    pub fn b_n(&self) -> &[f64] {
        &self.b_n
    }

    pub fn degree(&self) -> usize {
        self.a_n.len()
    }

    /// The first `degree` harmonics of this set.
    pub fn truncated(&self, degree: usize) -> FourierResult<Self> {
        if degree > self.degree() {
            return Err(FourierError::index_range(
                degree,
                self.a_n.len(),
                self.b_n.len(),
            ));
        }
        Ok(Self {
            a0: self.a0,
            a_n: self.a_n[..degree].to_vec(),
            b_n: self.b_n[..degree].to_vec(),
        })
    }

    /// Every coefficient multiplied by `alpha`.
    pub fn scaled(&self, alpha: f64) -> Self {
        Self {
            a0: self.a0 * alpha,
            a_n: self.a_n.iter().map(|v| v * alpha).collect(),
            b_n: self.b_n.iter().map(|v| v * alpha).collect(),
        }
    }

    /// Evaluate the series truncated at `degree`; see [`crate::evaluate_series`].
    pub fn evaluate(&self, x: f64, degree: usize, period: f64) -> FourierResult<f64> {
        super::evaluate::evaluate_series(x, degree, self.a0, &self.a_n, &self.b_n, period)
    }
}

/// Mean value of `f` over `[low, high]`.
pub fn compute_a0<F>(f: &F, low: f64, high: f64) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    compute_a0_with(f, low, high, &QuadratureOpts::default())
}

pub fn compute_a0_with<F>(f: &F, low: f64, high: f64, opts: &QuadratureOpts) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    let domain = Domain::new(low, high)?;
    let points = f.breakpoints(low, high);
    let r = integrate(|x| f.eval(x), low, high, &points, opts)?;
    Ok(r.value / domain.width())
}

/// Cosine coefficient of harmonic `n` (`n >= 1`).
pub fn compute_an<F>(f: &F, n: usize, low: f64, high: f64) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    compute_an_with(f, n, low, high, &QuadratureOpts::default())
}

pub fn compute_an_with<F>(
    f: &F,
    n: usize,
    low: f64,
    high: f64,
    opts: &QuadratureOpts,
) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    harmonic(f, n, low, high, opts, f64::cos)
}

/// Sine coefficient of harmonic `n` (`n >= 1`).
pub fn compute_bn<F>(f: &F, n: usize, low: f64, high: f64) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    compute_bn_with(f, n, low, high, &QuadratureOpts::default())
}

pub fn compute_bn_with<F>(
    f: &F,
    n: usize,
    low: f64,
    high: f64,
    opts: &QuadratureOpts,
) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    harmonic(f, n, low, high, opts, f64::sin)
}

fn harmonic<F>(
    f: &F,
    n: usize,
    low: f64,
    high: f64,
    opts: &QuadratureOpts,
    wave: fn(f64) -> f64,
) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    if n == 0 {
        return Err(FourierError::validation("harmonic index n must be >= 1"));
    }
    let domain = Domain::new(low, high)?;
    let width = domain.width();
    let omega = 2.0 * PI * n as f64 / width;
    let points = f.breakpoints(low, high);
    let r = integrate(|x| f.eval(x) * wave(omega * x), low, high, &points, opts)?;
    Ok(r.value * 2.0 / width)
}

/// `a0` plus `a_n`/`b_n` for harmonics `1..=degree`.
pub fn compute_coefficients<F>(
    f: &F,
    degree: usize,
    low: f64,
    high: f64,
) -> FourierResult<CoefficientSet>
where
    F: TargetFunction + ?Sized,
{
    compute_coefficients_with(f, degree, low, high, &QuadratureOpts::default())
}

#[tracing::instrument(skip(f, opts))]
pub fn compute_coefficients_with<F>(
    f: &F,
    degree: usize,
    low: f64,
    high: f64,
    opts: &QuadratureOpts,
) -> FourierResult<CoefficientSet>
where
    F: TargetFunction + ?Sized,
{
    let a0 = compute_a0_with(f, low, high, opts)?;
    let mut a_n = Vec::with_capacity(degree);
    let mut b_n = Vec::with_capacity(degree);
    for n in 1..=degree {
        a_n.push(compute_an_with(f, n, low, high, opts)?);
        b_n.push(compute_bn_with(f, n, low, high, opts)?);
    }
    CoefficientSet::new(a0, a_n, b_n)
}

#[cfg(test)]
#[path = "../../tests/unit/series/coefficients.rs"]
mod tests;
