//! Degree-by-degree convergence timeline.
//!
//! This is the data the rendering layer needs to animate a series converging: for every
//! scheduled degree a coefficient set and a sampled curve, and for every output frame the
//! curve to draw. Transitions morph the previous curve into the next one point by point.

use crate::{
    animation::ease::Ease,
    foundation::{
        domain::{Domain, Sample},
        error::{FourierError, FourierResult},
    },
    numeric::quadrature::QuadratureOpts,
    series::{
        coefficients::{CoefficientSet, compute_coefficients_with},
        evaluate::{mean_squared_error, sample_series},
    },
    target::piecewise::TargetFunction,
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Sample {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Sample::new(
            <f64 as Lerp>::lerp(&a.x, &b.x, t),
            <f64 as Lerp>::lerp(&a.y, &b.y, t),
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Ordered, non-empty list of degrees to show.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct DegreeSchedule(Vec<usize>);

impl DegreeSchedule {
    pub fn new(degrees: Vec<usize>) -> FourierResult<Self> {
        if degrees.is_empty() {
            return Err(FourierError::validation(
                "DegreeSchedule must contain at least one degree",
            ));
        }
        Ok(Self(degrees))
    }

    /// The sequence the signature animation steps through.
    pub fn reference() -> Self {
        Self(vec![
            1, 2, 3, 4, 5, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 95, 100,
        ])
    }

    pub fn degrees(&self) -> &[usize] {
        &self.0
    }

    pub fn max_degree(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

impl TryFrom<Vec<usize>> for DegreeSchedule {
    type Error = FourierError;

    fn try_from(v: Vec<usize>) -> FourierResult<Self> {
        Self::new(v)
    }
}

impl From<DegreeSchedule> for Vec<usize> {
    fn from(s: DegreeSchedule) -> Self {
        s.0
    }
}

/// One scheduled degree: its coefficients, sampled curve and error against the target.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ConvergenceStep {
    pub degree: usize,
    pub coefficients: CoefficientSet,
    pub samples: Vec<Sample>,
    pub mse: f64,
}

/// Approximate `f` at every scheduled degree over `domain` (period = domain width).
///
/// Coefficients are computed once, at the largest scheduled degree, and truncated per step;
/// each harmonic's coefficient does not depend on the degree it is computed for.
#[tracing::instrument(skip(f, schedule, opts), fields(steps = schedule.degrees().len()))]
pub fn build_convergence<F>(
    f: &F,
    schedule: &DegreeSchedule,
    domain: Domain,
    num_points: usize,
    opts: &QuadratureOpts,
) -> FourierResult<Vec<ConvergenceStep>>
where
    F: TargetFunction + ?Sized,
{
    domain.validate()?;
    if num_points < 2 {
        return Err(FourierError::validation("num_points must be >= 2"));
    }

    let period = domain.period();
    let full = compute_coefficients_with(
        f,
        schedule.max_degree(),
        domain.low,
        domain.high,
        opts,
    )?;

    schedule
        .degrees()
        .iter()
        .map(|&degree| {
            let coefficients = full.truncated(degree)?;
            let samples = sample_series(
                &coefficients,
                degree,
                period,
                domain.low,
                domain.high,
                num_points,
            )?;
            let mse = mean_squared_error(
                f,
                &coefficients,
                degree,
                period,
                domain.low,
                domain.high,
                num_points,
            )?;
            tracing::debug!(degree, mse, "convergence step");
            Ok(ConvergenceStep {
                degree,
                coefficients,
                samples,
                mse,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub fps: u32,
    /// Frames each degree stays on screen once reached (must be > 0).
    pub hold_frames: u64,
    /// Frames spent morphing from one degree to the next.
    pub morph_frames: u64,
    pub ease: Ease,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            hold_frames: 15,
            morph_frames: 30,
            ease: Ease::Smooth,
        }
    }
}

impl TimelineSettings {
    pub fn validate(&self) -> FourierResult<()> {
        if self.fps == 0 {
            return Err(FourierError::validation("TimelineSettings fps must be > 0"));
        }
        if self.hold_frames == 0 {
            return Err(FourierError::validation(
                "TimelineSettings hold_frames must be > 0",
            ));
        }
        Ok(())
    }
}

/// What to draw on one output frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineFrame {
    pub frame: FrameIndex,
    pub time_s: f64,
    pub from_degree: usize,
    pub to_degree: usize,
    /// Eased transition progress; 1.0 while holding.
    pub progress: f64,
    pub samples: Vec<Sample>,
}

/// Frame layout: the first step holds, then every later step morphs in and holds.
pub struct Timeline<'a> {
    steps: &'a [ConvergenceStep],
    settings: TimelineSettings,
}

impl<'a> Timeline<'a> {
    pub fn new(steps: &'a [ConvergenceStep], settings: TimelineSettings) -> FourierResult<Self> {
        settings.validate()?;
        let Some(first) = steps.first() else {
            return Err(FourierError::validation(
                "Timeline needs at least one convergence step",
            ));
        };
        if steps.iter().any(|s| s.samples.len() != first.samples.len()) {
            return Err(FourierError::validation(
                "Timeline steps must share one sample grid",
            ));
        }
        Ok(Self { steps, settings })
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn frame_count(&self) -> u64 {
        let transitions = (self.steps.len() - 1) as u64;
        let segment = self.settings.morph_frames + self.settings.hold_frames;
        self.settings.hold_frames + transitions * segment
    }

    pub fn duration_s(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.settings.fps)
    }

    pub fn eval_frame(&self, frame: FrameIndex) -> FourierResult<TimelineFrame> {
        if frame.0 >= self.frame_count() {
            return Err(FourierError::validation(format!(
                "frame {} is out of bounds (timeline has {} frames)",
                frame.0,
                self.frame_count()
            )));
        }

        let hold = self.settings.hold_frames;
        let morph = self.settings.morph_frames;
        let time_s = frame.0 as f64 / f64::from(self.settings.fps);

        if frame.0 < hold {
            return Ok(self.holding(frame, time_s, 0));
        }

        let rest = frame.0 - hold;
        let segment = morph + hold;
        let to = (rest / segment) as usize + 1;
        let within = rest % segment;
        if within >= morph {
            return Ok(self.holding(frame, time_s, to));
        }

        let from_step = &self.steps[to - 1];
        let to_step = &self.steps[to];
        let t = (within + 1) as f64 / morph as f64;
        let progress = self.settings.ease.apply(t);
        let samples = from_step
            .samples
            .iter()
            .zip(&to_step.samples)
            .map(|(a, b)| <Sample as Lerp>::lerp(a, b, progress))
            .collect();

        Ok(TimelineFrame {
            frame,
            time_s,
            from_degree: from_step.degree,
            to_degree: to_step.degree,
            progress,
            samples,
        })
    }

    fn holding(&self, frame: FrameIndex, time_s: f64, step: usize) -> TimelineFrame {
        let s = &self.steps[step];
        TimelineFrame {
            frame,
            time_s,
            from_degree: s.degree,
            to_degree: s.degree,
            progress: 1.0,
            samples: s.samples.clone(),
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = FourierResult<TimelineFrame>> + '_ {
        (0..self.frame_count()).map(|f| self.eval_frame(FrameIndex(f)))
    }
}

/// Every frame of the timeline over `steps`, in order.
pub fn timeline_frames(
    steps: &[ConvergenceStep],
    settings: TimelineSettings,
) -> FourierResult<Vec<TimelineFrame>> {
    Timeline::new(steps, settings)?.frames().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
