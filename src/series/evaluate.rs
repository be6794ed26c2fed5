use std::f64::consts::PI;

use crate::{
    foundation::{
        domain::{Domain, Sample, linspace, validate_period},
        error::{FourierError, FourierResult},
    },
    numeric::quadrature::QuadratureOpts,
    series::coefficients::{CoefficientSet, compute_coefficients_with},
    target::piecewise::TargetFunction,
};

/// `a0 + sum_{n=1}^{degree} a_n[n] cos(2 pi n x / P) + b_n[n] sin(2 pi n x / P)`.
///
/// Only the first `degree` entries of `a_n`/`b_n` are read; asking for more than either
/// holds is an [`FourierError::IndexRange`]. `degree == 0` returns `a0` exactly.
pub fn evaluate_series(
    x: f64,
    degree: usize,
    a0: f64,
    a_n: &[f64],
    b_n: &[f64],
    period: f64,
) -> FourierResult<f64> {
    if degree > a_n.len() || degree > b_n.len() {
        return Err(FourierError::index_range(degree, a_n.len(), b_n.len()));
    }
    validate_period(period)?;

    let base = 2.0 * PI * x / period;
    let harmonics: f64 = a_n[..degree]
        .iter()
        .zip(&b_n[..degree])
        .enumerate()
        .map(|(k, (a, b))| {
            let phase = (k + 1) as f64 * base;
            a * phase.cos() + b * phase.sin()
        })
        .sum();
    Ok(a0 + harmonics)
}

/// The series evaluated on `linspace(low, high, num_points)`.
pub fn sample_series(
    coeffs: &CoefficientSet,
    degree: usize,
    period: f64,
    low: f64,
    high: f64,
    num_points: usize,
) -> FourierResult<Vec<Sample>> {
    linspace(low, high, num_points)
        .into_iter()
        .map(|x| Ok(Sample::new(x, coeffs.evaluate(x, degree, period)?)))
        .collect()
}

/// The target itself on `linspace(low, high, num_points)`.
pub fn sample_target<F>(f: &F, low: f64, high: f64, num_points: usize) -> Vec<Sample>
where
    F: TargetFunction + ?Sized,
{
    linspace(low, high, num_points)
        .into_iter()
        .map(|x| Sample::new(x, f.eval(x)))
        .collect()
}

/// Mean squared difference between the target and its truncated series over a sample grid.
pub fn mean_squared_error<F>(
    f: &F,
    coeffs: &CoefficientSet,
    degree: usize,
    period: f64,
    low: f64,
    high: f64,
    num_points: usize,
) -> FourierResult<f64>
where
    F: TargetFunction + ?Sized,
{
    if num_points == 0 {
        return Err(FourierError::validation("num_points must be > 0"));
    }
    let mut total = 0.0;
    for x in linspace(low, high, num_points) {
        let d = f.eval(x) - coeffs.evaluate(x, degree, period)?;
        total += d * d;
    }
    Ok(total / num_points as f64)
}

/// Sampled series of one or two targets, as drawn by the static comparison chart.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Comparison {
    pub degree: usize,
    pub domain: Domain,
    pub primary: Vec<Sample>,
    pub secondary: Option<Vec<Sample>>,
}

/// Approximate `f` (and optionally `g`) to `degree` over `[low, high]` with period
/// `high - low`, sampling each series at `num_points` points.
pub fn comparison_samples<F, G>(
    f: &F,
    g: Option<&G>,
    degree: usize,
    low: f64,
    high: f64,
    num_points: usize,
    opts: &QuadratureOpts,
) -> FourierResult<Comparison>
where
    F: TargetFunction + ?Sized,
    G: TargetFunction + ?Sized,
{
    let domain = Domain::new(low, high)?;
    let period = domain.period();

    let fc = compute_coefficients_with(f, degree, low, high, opts)?;
    let primary = sample_series(&fc, degree, period, low, high, num_points)?;

    let secondary = match g {
        Some(g) => {
            let gc = compute_coefficients_with(g, degree, low, high, opts)?;
            Some(sample_series(&gc, degree, period, low, high, num_points)?)
        }
        None => None,
    };

    Ok(Comparison {
        degree,
        domain,
        primary,
        secondary,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/series/evaluate.rs"]
mod tests;
