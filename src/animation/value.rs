use crate::{
    animation::keyframe::Axis,
    foundation::core::{Affine, Point, Vec2, fmt_num},
};

/// Target pose of one keyframe, before the origin is known.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pose {
    Translate { x: f64, y: f64 },
    /// Angle in degrees, clockwise in SVG user space.
    Rotate { angle: f64 },
    Scale { x: f64, y: f64 },
}

impl Pose {
    pub fn axis(self) -> Axis {
        match self {
            Self::Translate { .. } => Axis::Translate,
            Self::Rotate { .. } => Axis::Rotate,
            Self::Scale { .. } => Axis::Scale,
        }
    }

    /// Bind the pose to a pivot. Translation ignores the origin.
    pub fn with_origin(self, origin: Point) -> TransformValue {
        match self {
            Self::Translate { x, y } => TransformValue::Translate { x, y },
            Self::Rotate { angle } => TransformValue::Rotate {
                angle,
                cx: origin.x,
                cy: origin.y,
            },
            Self::Scale { x, y } => TransformValue::Scale {
                x,
                y,
                cx: origin.x,
                cy: origin.y,
            },
        }
    }
}

/// A concrete transform assigned to one axis group.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransformValue {
    Translate { x: f64, y: f64 },
    Rotate { angle: f64, cx: f64, cy: f64 },
    Scale { x: f64, y: f64, cx: f64, cy: f64 },
}

impl TransformValue {
    /// The no-op transform of the same axis, keeping `self`'s pivot.
    pub fn identity_like(self) -> Self {
        match self {
            Self::Translate { .. } => Self::Translate { x: 0.0, y: 0.0 },
            Self::Rotate { cx, cy, .. } => Self::Rotate { angle: 0.0, cx, cy },
            Self::Scale { cx, cy, .. } => Self::Scale {
                x: 1.0,
                y: 1.0,
                cx,
                cy,
            },
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Translate { .. } => Axis::Translate,
            Self::Rotate { .. } => Axis::Rotate,
            Self::Scale { .. } => Axis::Scale,
        }
    }

    pub fn to_affine(self) -> Affine {
        match self {
            Self::Translate { x, y } => Affine::translate(Vec2::new(x, y)),
            Self::Rotate { angle, cx, cy } => {
                Affine::rotate_about(angle.to_radians(), Point::new(cx, cy))
            }
            Self::Scale { x, y, cx, cy } => {
                let pivot = Vec2::new(cx, cy);
                Affine::translate(pivot) * Affine::scale_non_uniform(x, y) * Affine::translate(-pivot)
            }
        }
    }

    /// Value for an SVG `transform` attribute.
    pub fn to_svg(self) -> String {
        match self {
            Self::Translate { x, y } => format!("translate({} {})", fmt_num(x), fmt_num(y)),
            Self::Rotate { angle, cx, cy } => format!(
                "rotate({} {} {})",
                fmt_num(angle),
                fmt_num(cx),
                fmt_num(cy)
            ),
            Self::Scale { x, y, cx, cy } => format!(
                "translate({} {}) scale({} {}) translate({} {})",
                fmt_num(cx),
                fmt_num(cy),
                fmt_num(x),
                fmt_num(y),
                fmt_num(-cx),
                fmt_num(-cy)
            ),
        }
    }

    /// Component-wise interpolation toward `to`.
    ///
    /// Values of different axes do not interpolate; the target is returned unchanged.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        fn mix(a: f64, b: f64, t: f64) -> f64 {
            a + (b - a) * t
        }

        match (self, to) {
            (Self::Translate { x: ax, y: ay }, Self::Translate { x: bx, y: by }) => {
                Self::Translate {
                    x: mix(ax, bx, t),
                    y: mix(ay, by, t),
                }
            }
            (
                Self::Rotate {
                    angle: a,
                    cx: acx,
                    cy: acy,
                },
                Self::Rotate {
                    angle: b,
                    cx: bcx,
                    cy: bcy,
                },
            ) => Self::Rotate {
                angle: mix(a, b, t),
                cx: mix(acx, bcx, t),
                cy: mix(acy, bcy, t),
            },
            (
                Self::Scale {
                    x: ax,
                    y: ay,
                    cx: acx,
                    cy: acy,
                },
                Self::Scale {
                    x: bx,
                    y: by,
                    cx: bcx,
                    cy: bcy,
                },
            ) => Self::Scale {
                x: mix(ax, bx, t),
                y: mix(ay, by, t),
                cx: mix(acx, bcx, t),
                cy: mix(acy, bcy, t),
            },
            (_, to) => to,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
