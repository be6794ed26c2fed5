/// Rate functions shaping how a transition progresses over its frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    InOutCubic,
    /// Logistic S-curve (inflection 10), rescaled to hit 0 and 1 exactly.
    Smooth,
    /// First half of [`Ease::Smooth`], stretched: slow start, full speed at the end.
    RushInto,
    /// Second half of [`Ease::Smooth`], stretched: full speed start, slow end.
    RushFrom,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Smooth => smooth(t),
            Self::RushInto => 2.0 * smooth(t / 2.0),
            Self::RushFrom => 2.0 * smooth(t / 2.0 + 0.5) - 1.0,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn smooth(t: f64) -> f64 {
    const INFLECTION: f64 = 10.0;
    let floor = sigmoid(-INFLECTION / 2.0);
    ((sigmoid(INFLECTION * (t - 0.5)) - floor) / (1.0 - 2.0 * floor)).clamp(0.0, 1.0)
}
