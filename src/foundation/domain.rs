use crate::foundation::error::{FourierError, FourierResult};

/// A finite sampling/integration interval `[low, high]` with `low < high`.
///
/// The period of the approximated function is taken to be `high - low`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    pub low: f64,
    pub high: f64,
}

impl Domain {
    pub fn new(low: f64, high: f64) -> FourierResult<Self> {
        let d = Self { low, high };
        d.validate()?;
        Ok(d)
    }

    pub fn validate(&self) -> FourierResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(FourierError::validation("Domain bounds must be finite"));
        }
        if self.low >= self.high {
            return Err(FourierError::validation("Domain low must be < high"));
        }
        Ok(())
    }

    pub fn width(self) -> f64 {
        self.high - self.low
    }

    pub fn period(self) -> f64 {
        self.width()
    }

    pub fn contains(self, x: f64) -> bool {
        self.low <= x && x <= self.high
    }
}

/// One evaluated point of a curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Sample> for kurbo::Point {
    fn from(s: Sample) -> Self {
        kurbo::Point::new(s.x, s.y)
    }
}

/// `num` evenly spaced points over `[low, high]`, both endpoints included.
///
/// `num == 0` yields nothing and `num == 1` yields `[low]`.
pub fn linspace(low: f64, high: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| low + step * i as f64).collect();
            // pin the last point to avoid accumulated drift
            out[num - 1] = high;
            out
        }
    }
}

pub(crate) fn validate_period(period: f64) -> FourierResult<()> {
    if !period.is_finite() || period <= 0.0 {
        return Err(FourierError::validation("period must be finite and > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/domain.rs"]
mod tests;
