use crate::{
    foundation::error::FourierResult,
    target::piecewise::{Formula, Interval, PiecewiseFunction, PiecewiseRule},
};

/// Period of [`reference_function`].
pub const REFERENCE_PERIOD: f64 = 400.0;

/// Built-in targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPreset {
    /// [`reference_function`]; always period [`REFERENCE_PERIOD`].
    Reference,
    Square,
    Sawtooth,
}

impl TargetPreset {
    /// Build the preset. `period` is ignored by [`TargetPreset::Reference`].
    pub fn build(self, period: f64) -> FourierResult<PiecewiseFunction> {
        match self {
            Self::Reference => reference_function(),
            Self::Square => square_wave(period),
            Self::Sawtooth => sawtooth(period),
        }
    }
}

/// The signature curve drawn by the convergence animation.
///
/// Rule order and endpoint ownership are part of the contract: sampled boundary points
/// (50, 100, 150, 200, 225, 250, 300, 350) take the value of the first rule listed here
/// that contains them.
pub fn reference_function() -> FourierResult<PiecewiseFunction> {
    let rules = vec![
        PiecewiseRule::new(Interval::below(50.0), Formula::constant(0.0)),
        PiecewiseRule::new(Interval::closed(50.0, 100.0), Formula::linear(-2.0, 200.0)),
        PiecewiseRule::new(Interval::open_closed(100.0, 150.0), Formula::constant(100.0)),
        PiecewiseRule::new(Interval::open(150.0, 200.0), Formula::constant(0.0)),
        PiecewiseRule::new(Interval::closed(200.0, 225.0), Formula::linear(4.0, -800.0)),
        PiecewiseRule::new(Interval::open_closed(225.0, 250.0), Formula::linear(-4.0, 1000.0)),
        PiecewiseRule::new(Interval::open_closed(250.0, 300.0), Formula::constant(0.0)),
        PiecewiseRule::new(Interval::open_closed(300.0, 350.0), Formula::constant(100.0)),
        PiecewiseRule::new(Interval::at_most(REFERENCE_PERIOD), Formula::constant(0.0)),
    ];
    PiecewiseFunction::new(REFERENCE_PERIOD, rules, Some(Formula::constant(0.0)))
}

/// `+1` on the first half period, `-1` on the second.
pub fn square_wave(period: f64) -> FourierResult<PiecewiseFunction> {
    let half = 0.5 * period;
    let rules = vec![
        PiecewiseRule::new(Interval::closed_open(0.0, half), Formula::constant(1.0)),
        PiecewiseRule::new(Interval::closed(half, period), Formula::constant(-1.0)),
    ];
    PiecewiseFunction::new(period, rules, None)
}

/// Rises linearly from 0 to 1 over each period.
pub fn sawtooth(period: f64) -> FourierResult<PiecewiseFunction> {
    let rules = vec![PiecewiseRule::new(
        Interval::closed(0.0, period),
        Formula::linear(1.0 / period, 0.0),
    )];
    PiecewiseFunction::new(period, rules, None)
}
