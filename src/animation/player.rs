use crate::{
    animation::ease::Ease,
    animation::keyframe::{Axis, KeyframeTrack},
    animation::value::TransformValue,
    foundation::core::{Point, Rect},
};

/// Whether a step changes the pose or only waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Initial delay before the first visible motion; the pose is already keyframe 0's.
    Pause,
    /// Transition from the previous pose to `target`.
    Animate,
}

/// One unit of playback for keyframe `index`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub index: usize,
    pub kind: StepKind,
    pub duration_ms: f64,
    pub target: TransformValue,
    pub ease: Ease,
}

/// A [`Step`] placed on the tween's own clock (0 = playback start).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduledStep {
    pub start_ms: f64,
    pub end_ms: f64,
    #[serde(flatten)]
    pub step: Step,
}

/// Driven iterator over the steps of one axis.
///
/// Index 0 yields a pause of `keys[0].step * duration_step`; index `i > 0` yields an animation of
/// `(keys[i].step - keys[i - 1].step) * duration_step`. Nothing is yielded after the last index.
#[derive(Clone, Debug)]
pub struct KeyframePlayer {
    track: KeyframeTrack,
    duration_step: f64,
    origin: Point,
    next_index: usize,
}

impl KeyframePlayer {
    pub fn new(track: KeyframeTrack, duration_step: f64, origin: Point) -> Self {
        Self {
            track,
            duration_step,
            origin,
            next_index: 0,
        }
    }

    /// Resolve the pivot from the track's first-keyframe anchors and the group's bounding box,
    /// then build the player.
    pub fn with_bbox(track: KeyframeTrack, duration_step: f64, bbox: Rect) -> Self {
        let origin = resolve_origin(&track, bbox);
        Self::new(track, duration_step, origin)
    }

    pub fn axis(&self) -> Axis {
        self.track.axis()
    }

    pub fn track(&self) -> &KeyframeTrack {
        &self.track
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn duration_step(&self) -> f64 {
        self.duration_step
    }

    /// Pose the group is snapped to before playback begins.
    pub fn initial_value(&self) -> TransformValue {
        self.value_at(0)
    }

    /// Whether the terminal index has been yielded.
    pub fn is_done(&self) -> bool {
        self.next_index >= self.track.len()
    }

    /// Total playback time: the last step value times the step duration.
    pub fn total_duration_ms(&self) -> f64 {
        self.track.last_step() as f64 * self.duration_step
    }

    /// Every step from the beginning with absolute start/end times, independent of how far this
    /// player has advanced.
    pub fn schedule(&self) -> Vec<ScheduledStep> {
        let mut fresh = self.clone();
        fresh.next_index = 0;
        let keys = self.track.keys();
        fresh
            .map(|step| {
                let start_step = if step.index == 0 {
                    0
                } else {
                    keys[step.index - 1].step
                };
                ScheduledStep {
                    start_ms: start_step as f64 * self.duration_step,
                    end_ms: keys[step.index].step as f64 * self.duration_step,
                    step,
                }
            })
            .collect()
    }

    fn value_at(&self, index: usize) -> TransformValue {
        self.track.keys()[index].pose.with_origin(self.origin)
    }
}

impl Iterator for KeyframePlayer {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let index = self.next_index;
        let keys = self.track.keys();
        let key = keys.get(index)?;
        self.next_index += 1;

        let (kind, steps) = if index == 0 {
            (StepKind::Pause, key.step)
        } else {
            (StepKind::Animate, key.step - keys[index - 1].step)
        };

        Some(Step {
            index,
            kind,
            duration_ms: steps as f64 * self.duration_step,
            target: self.value_at(index),
            ease: key.ease,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.track.len().saturating_sub(self.next_index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for KeyframePlayer {}

/// Pivot for rotate/scale from the track's first keyframe anchors (default center).
pub fn resolve_origin(track: &KeyframeTrack, bbox: Rect) -> Point {
    Point::new(track.anchor_x().resolve(bbox), track.anchor_y().resolve(bbox))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/player.rs"]
mod tests;
