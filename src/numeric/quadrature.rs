//! Globally adaptive Gauss–Kronrod quadrature.
//!
//! The integration range is first split at caller-supplied breakpoints (discontinuities or
//! kinks of the integrand), then the subinterval with the largest error estimate is bisected
//! until the summed estimate meets `max(epsabs, epsrel * |result|)` or the subinterval budget
//! runs out. Error estimates follow the usual QUADPACK 21-point heuristics, including the
//! `50 * eps * integral(|f|)` roundoff floor: once every segment sits at its floor, further
//! bisection cannot help and the result is returned as converged.

/// Tolerances and subdivision budget for [`integrate`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuadratureOpts {
    /// Absolute error target.
    pub epsabs: f64,
    /// Relative error target.
    pub epsrel: f64,
    /// Subinterval budget on top of the pieces the breakpoints already create.
    pub limit: usize,
}

impl Default for QuadratureOpts {
    fn default() -> Self {
        Self {
            epsabs: 1.49e-8,
            epsrel: 1.49e-8,
            limit: 200,
        }
    }
}

impl QuadratureOpts {
    pub fn validate(&self) -> Result<(), IntegrationError> {
        if self.epsabs.is_nan() || self.epsrel.is_nan() || self.epsabs < 0.0 || self.epsrel < 0.0
        {
            return Err(IntegrationError::InvalidOptions(
                "tolerances must be >= 0".to_string(),
            ));
        }
        if self.epsabs == 0.0 && self.epsrel == 0.0 {
            return Err(IntegrationError::InvalidOptions(
                "at least one tolerance must be > 0".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(IntegrationError::InvalidOptions(
                "limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A converged integral together with its bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Integral {
    pub value: f64,
    pub abserr: f64,
    pub intervals: usize,
    pub evaluations: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("integration error: bounds must be finite (got [{low}, {high}])")]
    InvalidBounds { low: f64, high: f64 },

    #[error("integration error: integrand is not finite at x = {x} (value {value})")]
    NonFiniteIntegrand { x: f64, value: f64 },

    #[error(
        "integration error: no convergence within {limit} subintervals (result {result}, estimated error {abserr})"
    )]
    DidNotConverge {
        limit: usize,
        result: f64,
        abserr: f64,
    },

    #[error("integration error: roundoff prevents subdividing [{a}, {b}]")]
    Roundoff { a: f64, b: f64 },

    #[error("integration error: invalid options: {0}")]
    InvalidOptions(String),
}

// 21-point Kronrod abscissae on [-1, 1] (positive half, descending); odd indices are the
// 10-point Gauss abscissae.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_367_241_405,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

#[derive(Clone, Copy, Debug)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
    /// Part of `error` that bisection cannot reduce.
    roundoff: f64,
}

/// Integrate `f` over `[low, high]`, splitting first at `points` that fall strictly inside.
///
/// Reversed bounds integrate the other way and negate; equal bounds integrate to zero.
pub fn integrate<F>(
    f: F,
    low: f64,
    high: f64,
    points: &[f64],
    opts: &QuadratureOpts,
) -> Result<Integral, IntegrationError>
where
    F: Fn(f64) -> f64,
{
    opts.validate()?;
    if !low.is_finite() || !high.is_finite() {
        return Err(IntegrationError::InvalidBounds { low, high });
    }
    if low == high {
        return Ok(Integral {
            value: 0.0,
            abserr: 0.0,
            intervals: 0,
            evaluations: 0,
        });
    }
    if low > high {
        let flipped = integrate(f, high, low, points, opts)?;
        return Ok(Integral {
            value: -flipped.value,
            ..flipped
        });
    }

    let mut cuts: Vec<f64> = points
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > low && *p < high)
        .collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let max_segments = cuts.len() + opts.limit;

    let mut evaluations = 0usize;
    let mut segments = Vec::with_capacity(max_segments);
    let mut a = low;
    for b in cuts.into_iter().chain(std::iter::once(high)) {
        segments.push(gauss_kronrod_21(&f, a, b, &mut evaluations)?);
        a = b;
    }

    loop {
        let (value, abserr, roundoff) = totals(&segments);
        let tolerance = opts.epsabs.max(opts.epsrel * value.abs());
        if abserr <= tolerance || abserr <= roundoff {
            if abserr > tolerance {
                tracing::debug!(
                    value,
                    abserr,
                    tolerance,
                    "quadrature limited by roundoff"
                );
            }
            tracing::trace!(
                value,
                abserr,
                intervals = segments.len(),
                evaluations,
                "quadrature converged"
            );
            return Ok(Integral {
                value,
                abserr,
                intervals: segments.len(),
                evaluations,
            });
        }

        if segments.len() >= max_segments {
            tracing::debug!(
                value,
                abserr,
                tolerance,
                limit = max_segments,
                "quadrature hit its subinterval limit"
            );
            return Err(IntegrationError::DidNotConverge {
                limit: max_segments,
                result: value,
                abserr,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, l), (_, r)| l.error.total_cmp(&r.error))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);

        let mid = 0.5 * (seg.a + seg.b);
        let scale = seg.a.abs().max(seg.b.abs()).max(f64::MIN_POSITIVE);
        if !(seg.a < mid && mid < seg.b) || (seg.b - seg.a) <= 1.0e3 * f64::EPSILON * scale {
            return Err(IntegrationError::Roundoff { a: seg.a, b: seg.b });
        }

        segments.push(gauss_kronrod_21(&f, seg.a, mid, &mut evaluations)?);
        segments.push(gauss_kronrod_21(&f, mid, seg.b, &mut evaluations)?);
    }
}

/// Summed value, error estimate and roundoff floor.
fn totals(segments: &[Segment]) -> (f64, f64, f64) {
    segments.iter().fold((0.0, 0.0, 0.0), |(v, e, r), s| {
        (v + s.value, e + s.error, r + s.roundoff)
    })
}

fn checked<F>(f: &F, x: f64, evaluations: &mut usize) -> Result<f64, IntegrationError>
where
    F: Fn(f64) -> f64,
{
    *evaluations += 1;
    let value = f(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IntegrationError::NonFiniteIntegrand { x, value })
    }
}

fn gauss_kronrod_21<F>(
    f: &F,
    a: f64,
    b: f64,
    evaluations: &mut usize,
) -> Result<Segment, IntegrationError>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let abs_half = half.abs();

    let fc = checked(f, center, evaluations)?;
    let mut res_gauss = 0.0;
    let mut res_kronrod = WGK[10] * fc;
    let mut res_abs = res_kronrod.abs();

    let mut fv1 = [0.0f64; 10];
    let mut fv2 = [0.0f64; 10];
    for j in 0..10 {
        let dx = half * XGK[j];
        let f1 = checked(f, center - dx, evaluations)?;
        let f2 = checked(f, center + dx, evaluations)?;
        fv1[j] = f1;
        fv2[j] = f2;
        let fsum = f1 + f2;
        res_kronrod += WGK[j] * fsum;
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * fsum;
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[10] * (fc - mean).abs();
    for j in 0..10 {
        res_asc += WGK[j] * ((fv1[j] - mean).abs() + (fv2[j] - mean).abs());
    }

    let value = res_kronrod * half;
    let res_abs = res_abs * abs_half;
    let res_asc = res_asc * abs_half;

    let mut error = ((res_kronrod - res_gauss) * half).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    let mut roundoff = 0.0;
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        roundoff = 50.0 * f64::EPSILON * res_abs;
        error = error.max(roundoff);
    }

    Ok(Segment {
        a,
        b,
        value,
        error,
        roundoff,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/numeric/quadrature.rs"]
mod tests;
