use crate::foundation::error::{FourierError, FourierResult};

/// Most breakpoints a piecewise target reports for one integration range.
pub const MAX_BREAKPOINTS: usize = 4096;

/// A real function that can be approximated by a Fourier series.
///
/// Any `Fn(f64) -> f64` closure is a target. Implementors with known discontinuities or
/// kinks should report them from [`TargetFunction::breakpoints`] so quadrature can split
/// the integration range there.
pub trait TargetFunction {
    fn eval(&self, x: f64) -> f64;

    /// Interior points of `(low, high)` where the function is not smooth.
    fn breakpoints(&self, _low: f64, _high: f64) -> Vec<f64> {
        Vec::new()
    }
}

impl<F> TargetFunction for F
where
    F: Fn(f64) -> f64,
{
    fn eval(&self, x: f64) -> f64 {
        self(x)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "at")]
pub enum Bound {
    Unbounded,
    Open(f64),
    Closed(f64),
}

impl Bound {
    fn value(self) -> Option<f64> {
        match self {
            Self::Unbounded => None,
            Self::Open(v) | Self::Closed(v) => Some(v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `[lo, hi]`
    pub fn closed(lo: f64, hi: f64) -> Self {
        Self::new(Bound::Closed(lo), Bound::Closed(hi))
    }

    /// `(lo, hi)`
    pub fn open(lo: f64, hi: f64) -> Self {
        Self::new(Bound::Open(lo), Bound::Open(hi))
    }

    /// `(lo, hi]`
    pub fn open_closed(lo: f64, hi: f64) -> Self {
        Self::new(Bound::Open(lo), Bound::Closed(hi))
    }

    /// `[lo, hi)`
    pub fn closed_open(lo: f64, hi: f64) -> Self {
        Self::new(Bound::Closed(lo), Bound::Open(hi))
    }

    /// `x < hi`
    pub fn below(hi: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Open(hi))
    }

    /// `x <= hi`
    pub fn at_most(hi: f64) -> Self {
        Self::new(Bound::Unbounded, Bound::Closed(hi))
    }

    pub fn contains(&self, x: f64) -> bool {
        let above_lower = match self.lower {
            Bound::Unbounded => true,
            Bound::Open(v) => x > v,
            Bound::Closed(v) => x >= v,
        };
        let below_upper = match self.upper {
            Bound::Unbounded => true,
            Bound::Open(v) => x < v,
            Bound::Closed(v) => x <= v,
        };
        above_lower && below_upper
    }

    fn endpoints(&self) -> impl Iterator<Item = f64> {
        [self.lower.value(), self.upper.value()].into_iter().flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind")]
pub enum Formula {
    Constant { value: f64 },
    Linear { slope: f64, intercept: f64 },
}

impl Formula {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    pub fn linear(slope: f64, intercept: f64) -> Self {
        Self::Linear { slope, intercept }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Constant { value } => value,
            Self::Linear { slope, intercept } => slope * x + intercept,
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::Constant { value } => value.is_finite(),
            Self::Linear { slope, intercept } => slope.is_finite() && intercept.is_finite(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PiecewiseRule {
    pub interval: Interval,
    pub formula: Formula,
}

impl PiecewiseRule {
    pub fn new(interval: Interval, formula: Formula) -> Self {
        Self { interval, formula }
    }
}

/// A periodic function given as an ordered table of interval rules over one period.
///
/// Evaluation reduces `x` into `[0, period)` with `rem_euclid`, then the first rule whose
/// interval contains the wrapped coordinate wins. When nothing matches, the fallback formula
/// (if any) is used. Rule order is significant: shared endpoints belong to the first rule
/// that claims them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "PiecewiseTable", into = "PiecewiseTable")]
pub struct PiecewiseFunction {
    period: f64,
    rules: Vec<PiecewiseRule>,
    fallback: Option<Formula>,
}

/// Unvalidated serde form of [`PiecewiseFunction`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PiecewiseTable {
    pub period: f64,
    pub rules: Vec<PiecewiseRule>,
    #[serde(default)]
    pub fallback: Option<Formula>,
}

impl TryFrom<PiecewiseTable> for PiecewiseFunction {
    type Error = FourierError;

    fn try_from(t: PiecewiseTable) -> FourierResult<Self> {
        Self::new(t.period, t.rules, t.fallback)
    }
}

impl From<PiecewiseFunction> for PiecewiseTable {
    fn from(f: PiecewiseFunction) -> Self {
        Self {
            period: f.period,
            rules: f.rules,
            fallback: f.fallback,
        }
    }
}

impl PiecewiseFunction {
    pub fn new(
        period: f64,
        rules: Vec<PiecewiseRule>,
        fallback: Option<Formula>,
    ) -> FourierResult<Self> {
        let f = Self {
            period,
            rules,
            fallback,
        };
        f.validate()?;
        Ok(f)
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn rules(&self) -> &[PiecewiseRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Option<Formula> {
        self.fallback
    }

    pub fn validate(&self) -> FourierResult<()> {
        crate::foundation::domain::validate_period(self.period)?;
        if self.rules.is_empty() && self.fallback.is_none() {
            return Err(FourierError::validation(
                "PiecewiseFunction needs at least one rule or a fallback",
            ));
        }
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.interval.endpoints().any(|v| !v.is_finite()) {
                return Err(FourierError::validation(format!(
                    "rule {idx}: interval bounds must be finite"
                )));
            }
            if !rule.formula.is_finite() {
                return Err(FourierError::validation(format!(
                    "rule {idx}: formula coefficients must be finite"
                )));
            }
        }
        if let Some(fb) = self.fallback
            && !fb.is_finite()
        {
            return Err(FourierError::validation(
                "fallback formula coefficients must be finite",
            ));
        }
        if self.fallback.is_none() {
            self.check_exhaustive()?;
        }
        Ok(())
    }

    /// Every point of `[0, period]` must be claimed by some rule.
    ///
    /// Coverage of a finite union of intervals can only change at interval endpoints, so it
    /// suffices to check each endpoint inside the period and one point between each pair of
    /// neighbouring endpoints.
    fn check_exhaustive(&self) -> FourierResult<()> {
        let mut marks: Vec<f64> = self
            .rules
            .iter()
            .flat_map(|r| r.interval.endpoints())
            .filter(|v| *v > 0.0 && *v < self.period)
            .chain([0.0, self.period])
            .collect();
        marks.sort_by(f64::total_cmp);
        marks.dedup();

        let mids: Vec<f64> = marks.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        for x in marks.iter().chain(mids.iter()).copied() {
            if self.matching_rule(x).is_none() {
                return Err(FourierError::UndefinedDomain { x, wrapped: x });
            }
        }
        Ok(())
    }

    fn matching_rule(&self, wrapped: f64) -> Option<&PiecewiseRule> {
        self.rules.iter().find(|r| r.interval.contains(wrapped))
    }

    /// Reduce `x` into the fundamental period.
    ///
    /// Tiny negative inputs can round up to exactly `period`; rules (or the fallback) must
    /// cover that point.
    pub fn wrap(&self, x: f64) -> f64 {
        x.rem_euclid(self.period)
    }

    pub fn try_eval(&self, x: f64) -> FourierResult<f64> {
        let wrapped = self.wrap(x);
        match self.matching_rule(wrapped) {
            Some(rule) => Ok(rule.formula.apply(wrapped)),
            None => self
                .fallback
                .map(|fb| fb.apply(wrapped))
                .ok_or(FourierError::UndefinedDomain { x, wrapped }),
        }
    }

    /// Parse and validate a table from JSON.
    pub fn from_json(text: &str) -> FourierResult<Self> {
        serde_json::from_str(text).map_err(|e| FourierError::serde(e.to_string()))
    }

    pub fn to_json(&self) -> FourierResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FourierError::serde(e.to_string()))
    }

    /// Rule endpoints inside one period, sorted and deduplicated.
    pub fn knots(&self) -> Vec<f64> {
        let mut knots: Vec<f64> = self
            .rules
            .iter()
            .flat_map(|r| r.interval.endpoints())
            .filter(|v| *v >= 0.0 && *v <= self.period)
            .collect();
        knots.sort_by(f64::total_cmp);
        knots.dedup();
        knots
    }
}

impl TargetFunction for PiecewiseFunction {
    fn eval(&self, x: f64) -> f64 {
        // Non-finite inputs are the only way past validation; quadrature reports NaN.
        self.try_eval(x).unwrap_or(f64::NAN)
    }

    fn breakpoints(&self, low: f64, high: f64) -> Vec<f64> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Vec::new();
        }
        let knots = self.knots();
        let first = (low / self.period).floor();
        let periods = (high / self.period).ceil() - first + 1.0;
        if periods * (knots.len() + 1) as f64 > MAX_BREAKPOINTS as f64 {
            tracing::debug!(
                low,
                high,
                period = self.period,
                "too many periods to report breakpoints; relying on adaptive refinement"
            );
            return Vec::new();
        }

        let mut out = Vec::new();
        for k in 0..periods as usize {
            let shift = (first + k as f64) * self.period;
            out.extend(
                knots
                    .iter()
                    .map(|v| v + shift)
                    .chain(std::iter::once(shift))
                    .filter(|p| *p > low && *p < high),
            );
        }
        out.sort_by(f64::total_cmp);
        out.dedup();
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/target/piecewise.rs"]
mod tests;
