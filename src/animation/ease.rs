use std::f64::consts::PI;

/// Named easing curves.
///
/// The first eight names are the classic SVG-toolkit table (`linear`, `easein`, `easeout`,
/// `easeinout`, `backin`, `backout`, `elastic`, `bounce`) with that table's exact curves, so
/// existing animation JSON keeps its pacing. The polynomial curves are extra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ease {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    BackIn,
    BackOut,
    Elastic,
    Bounce,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub const ALL: [Ease; 14] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::BackIn,
        Self::BackOut,
        Self::Elastic,
        Self::Bounce,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
    ];

    /// Look an easing up by its table name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easein",
            Self::EaseOut => "easeout",
            Self::EaseInOut => "easeinout",
            Self::BackIn => "backin",
            Self::BackOut => "backout",
            Self::Elastic => "elastic",
            Self::Bounce => "bounce",
            Self::InQuad => "inquad",
            Self::OutQuad => "outquad",
            Self::InOutQuad => "inoutquad",
            Self::InCubic => "incubic",
            Self::OutCubic => "outcubic",
            Self::InOutCubic => "inoutcubic",
        }
    }

    /// Map normalized time `t` to eased progress. `t` is clamped to `[0, 1]`; back and elastic
    /// curves may overshoot the unit range in between.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            // The toolkit table names these two the other way around from the usual convention.
            Self::EaseIn => t.powf(0.48),
            Self::EaseOut => t.powf(1.7),
            Self::EaseInOut => {
                if t == 1.0 {
                    return 1.0;
                }
                let q = 0.48 - t / 1.04;
                let big_q = (0.1734 + q * q).sqrt();
                let x = (big_q - q).cbrt();
                let y = (-big_q - q).cbrt();
                let s = x + y + 0.5;
                (1.0 - s) * 3.0 * s * s + s * s * s
            }
            Self::BackIn => {
                if t == 1.0 {
                    return 1.0;
                }
                let s = 1.70158;
                t * t * ((s + 1.0) * t - s)
            }
            Self::BackOut => {
                if t == 0.0 {
                    return 0.0;
                }
                let n = t - 1.0;
                let s = 1.70158;
                n * n * ((s + 1.0) * n + s) + 1.0
            }
            Self::Elastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                2f64.powf(-10.0 * t) * ((t - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
            }
            Self::Bounce => {
                let s = 7.5625;
                let p = 2.75;
                if t < 1.0 / p {
                    s * t * t
                } else if t < 2.0 / p {
                    let n = t - 1.5 / p;
                    s * n * n + 0.75
                } else if t < 2.5 / p {
                    let n = t - 2.25 / p;
                    s * n * n + 0.9375
                } else {
                    let n = t - 2.625 / p;
                    s * n * n + 0.984375
                }
            }
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
