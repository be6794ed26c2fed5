//! Fourierline approximates periodic, piecewise-defined functions by truncated Fourier
//! series and shows the approximation converging as the degree grows.
//!
//! # Pipeline overview
//!
//! 1. **Target**: a [`TargetFunction`], usually a [`PiecewiseFunction`] table that wraps its
//!    input into one period.
//! 2. **Coefficients**: [`compute_coefficients`] integrates the target against the cosine and
//!    sine basis with adaptive Gauss–Kronrod quadrature ([`integrate`]).
//! 3. **Series**: [`evaluate_series`] sums the truncated series at a point; [`sample_series`]
//!    samples it on an inclusive grid.
//! 4. **Timeline** (optional): [`build_convergence`] + [`Timeline`] turn a [`DegreeSchedule`]
//!    into per-frame curves that morph from one degree to the next.
//! 5. **Chart** (optional): [`render_chart`] rasterizes curves on the CPU; [`write_png`]
//!    writes the result.
//!
//! The period of every series is the width of the domain, `high - low`.
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod numeric;
mod render;
mod series;
mod target;

pub use animation::ease::Ease;
pub use animation::timeline::{
    ConvergenceStep, DegreeSchedule, FrameIndex, Lerp, Timeline, TimelineFrame,
    TimelineSettings, build_convergence, timeline_frames,
};
pub use foundation::domain::{Domain, Sample, linspace};
pub use foundation::error::{FourierError, FourierResult};
pub use numeric::quadrature::{Integral, IntegrationError, QuadratureOpts, integrate};
pub use render::chart::{
    CURVE_COLORS, ChartBounds, ChartSettings, Curve, DEFAULT_HEIGHT, DEFAULT_WIDTH, FrameRGBA,
    curve_path, render_chart, write_png,
};
pub use series::coefficients::{
    CoefficientSet, compute_a0, compute_a0_with, compute_an, compute_an_with, compute_bn,
    compute_bn_with, compute_coefficients, compute_coefficients_with,
};
pub use series::evaluate::{
    Comparison, comparison_samples, evaluate_series, mean_squared_error, sample_series,
    sample_target,
};
pub use target::piecewise::{
    Bound, Formula, Interval, MAX_BREAKPOINTS, PiecewiseFunction, PiecewiseRule,
    PiecewiseTable, TargetFunction,
};
pub use target::presets::{
    REFERENCE_PERIOD, TargetPreset, reference_function, sawtooth, square_wave,
};
