use std::fmt;

use crate::{
    animation::ease::Ease,
    animation::value::Pose,
    foundation::core::Rect,
    foundation::error::{KeyplayError, KeyplayResult},
};

/// One of the three independent transform families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Translate,
    Rotate,
    Scale,
}

impl Axis {
    /// Nesting order of the transform groups, outermost first.
    pub const ALL: [Axis; 3] = [Self::Translate, Self::Rotate, Self::Scale];

    /// Class attribute carried by the axis's transform group.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Named horizontal origin anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorX {
    Left,
    #[default]
    Center,
    Right,
}

impl AnchorX {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn resolve(self, bbox: Rect) -> f64 {
        match self {
            Self::Left => bbox.x0,
            Self::Center => bbox.center().x,
            Self::Right => bbox.x1,
        }
    }
}

/// Named vertical origin anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorY {
    Top,
    #[default]
    Center,
    Bottom,
}

impl AnchorY {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn resolve(self, bbox: Rect) -> f64 {
        match self {
            Self::Top => bbox.y0,
            Self::Center => bbox.center().y,
            Self::Bottom => bbox.y1,
        }
    }
}

/// A keyframe as it appears in animation JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Position on the shared step timeline.
    pub step: i64,
    /// Easing used to reach this pose from the previous one; `linear` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Horizontal origin anchor (`left`, `center`, `right`); only read on the first keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx: Option<String>,
    /// Vertical origin anchor (`top`, `center`, `bottom`); only read on the first keyframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<String>,
}

/// The per-axis keyframe lists of one animated element.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_keyframes: Option<Vec<Keyframe>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_keyframes: Option<Vec<Keyframe>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_keyframes: Option<Vec<Keyframe>>,
}

impl KeyframeSet {
    pub fn get(&self, axis: Axis) -> Option<&[Keyframe]> {
        match axis {
            Axis::Translate => self.translate_keyframes.as_deref(),
            Axis::Rotate => self.rotate_keyframes.as_deref(),
            Axis::Scale => self.scale_keyframes.as_deref(),
        }
    }

    /// Lists that are present, in group nesting order.
    pub fn present(&self) -> impl Iterator<Item = (Axis, &[Keyframe])> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.get(axis).map(|keys| (axis, keys)))
    }
}

/// A validated keyframe: integer step, resolved easing and an axis-specific pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Key {
    pub step: u64,
    pub ease: Ease,
    pub pose: Pose,
}

/// A validated, ordered keyframe list for one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeTrack {
    axis: Axis,
    keys: Vec<Key>,
    anchor_x: AnchorX,
    anchor_y: AnchorY,
}

impl KeyframeTrack {
    /// Validate raw keyframes for `axis`.
    ///
    /// Rejects empty lists, negative or decreasing steps, missing or non-finite pose fields,
    /// unknown easing names and unknown origin anchors.
    pub fn new(axis: Axis, raw: &[Keyframe]) -> KeyplayResult<Self> {
        if raw.is_empty() {
            return Err(KeyplayError::invalid_keyframe(axis, 0, "list is empty"));
        }

        let mut keys = Vec::with_capacity(raw.len());
        let mut anchor_x = AnchorX::default();
        let mut anchor_y = AnchorY::default();
        let mut prev_step = 0u64;
        for (index, kf) in raw.iter().enumerate() {
            let step = u64::try_from(kf.step).map_err(|_| {
                KeyplayError::invalid_keyframe(axis, index, format!("negative step {}", kf.step))
            })?;
            if index > 0 && step < prev_step {
                return Err(KeyplayError::invalid_keyframe(
                    axis,
                    index,
                    format!("step {step} is before previous step {prev_step}"),
                ));
            }
            prev_step = step;

            let ease = match kf.easing.as_deref() {
                None => Ease::Linear,
                Some(name) => Ease::from_name(name).ok_or_else(|| {
                    KeyplayError::invalid_keyframe(axis, index, format!("unknown easing '{name}'"))
                })?,
            };

            let ax = anchor(axis, index, "cx", kf.cx.as_deref(), AnchorX::from_name)?;
            let ay = anchor(axis, index, "cy", kf.cy.as_deref(), AnchorY::from_name)?;
            if index == 0 {
                anchor_x = ax.unwrap_or_default();
                anchor_y = ay.unwrap_or_default();
            } else if ax.is_some() || ay.is_some() {
                tracing::warn!(%axis, index, "origin anchors are only read on the first keyframe");
            }

            let pose = pose_for(axis, index, kf)?;
            keys.push(Key { step, ease, pose });
        }

        Ok(Self {
            axis,
            keys,
            anchor_x,
            anchor_y,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn anchor_x(&self) -> AnchorX {
        self.anchor_x
    }

    pub fn anchor_y(&self) -> AnchorY {
        self.anchor_y
    }

    /// Last step value; total playback time is this times the step duration.
    pub fn last_step(&self) -> u64 {
        self.keys.last().map_or(0, |k| k.step)
    }
}

fn anchor<T>(
    axis: Axis,
    index: usize,
    field: &str,
    name: Option<&str>,
    lookup: fn(&str) -> Option<T>,
) -> KeyplayResult<Option<T>> {
    name.map(|name| {
        lookup(name).ok_or_else(|| {
            KeyplayError::invalid_keyframe(axis, index, format!("unknown {field} anchor '{name}'"))
        })
    })
    .transpose()
}

fn pose_for(axis: Axis, index: usize, kf: &Keyframe) -> KeyplayResult<Pose> {
    let field = |name: &str, v: Option<f64>| -> KeyplayResult<f64> {
        match v {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(KeyplayError::invalid_keyframe(
                axis,
                index,
                format!("{name} must be finite, got {v}"),
            )),
            None => Err(KeyplayError::invalid_keyframe(
                axis,
                index,
                format!("missing {name}"),
            )),
        }
    };

    Ok(match axis {
        Axis::Translate => Pose::Translate {
            x: field("x", kf.x)?,
            y: field("y", kf.y)?,
        },
        Axis::Rotate => Pose::Rotate {
            angle: field("angle", kf.angle)?,
        },
        Axis::Scale => Pose::Scale {
            x: field("x", kf.x)?,
            y: field("y", kf.y)?,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
