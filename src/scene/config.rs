use crate::{
    animation::keyframe::{KeyframeSet, KeyframeTrack},
    foundation::error::{KeyplayError, KeyplayResult},
};

/// One animated element: a selector and its per-axis keyframe lists.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    /// Selector resolved inside the loaded SVG.
    pub id: String,
    #[serde(default)]
    pub keyframes: KeyframeSet,
}

impl AnimationSpec {
    /// Validated tracks for the present keyframe lists, in translate, rotate, scale order.
    pub fn tracks(&self) -> KeyplayResult<Vec<KeyframeTrack>> {
        self.keyframes
            .present()
            .map(|(axis, raw)| KeyframeTrack::new(axis, raw))
            .collect()
    }
}

/// Player options as supplied by the caller or read from the animation JSON.
///
/// Every field is optional so that several sources can be layered with [`PlayerOptions::merge`].
/// Unknown JSON keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    /// Location of the animation JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Selector of the container, inside the canvas document, that receives the SVG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<String>,
    /// Location of the SVG illustration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Total timeline length in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Number of step units the timeline is divided into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<Vec<AnimationSpec>>,
}

impl PlayerOptions {
    /// Parse options from JSON text.
    pub fn from_json_str(text: &str) -> KeyplayResult<Self> {
        serde_json::from_str(text).map_err(|e| KeyplayError::serde(e.to_string()))
    }

    /// Layer `other` on top of `self`: every field `other` sets replaces the current one.
    pub fn merge(&mut self, other: PlayerOptions) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.data, other.data);
        take(&mut self.canvas, other.canvas);
        take(&mut self.svg, other.svg);
        take(&mut self.duration, other.duration);
        take(&mut self.steps, other.steps);
        take(&mut self.animations, other.animations);
    }

    /// Check required fields and keyframes, producing the playable configuration.
    pub fn resolve(&self) -> KeyplayResult<AnimationConfig> {
        let svg = self
            .svg
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| KeyplayError::validation("svg location is required"))?;

        let duration_ms = self
            .duration
            .ok_or_else(|| KeyplayError::validation("duration is required"))?;
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(KeyplayError::validation(format!(
                "duration must be a positive number of milliseconds, got {duration_ms}"
            )));
        }

        let steps = self
            .steps
            .ok_or_else(|| KeyplayError::validation("steps is required"))?;
        if steps == 0 {
            return Err(KeyplayError::validation("steps must be > 0"));
        }

        let animations = self
            .animations
            .clone()
            .ok_or_else(|| KeyplayError::validation("animations is required"))?;

        for spec in &animations {
            if spec.id.trim().is_empty() {
                return Err(KeyplayError::validation("animation id must not be empty"));
            }
            for track in spec.tracks()? {
                if track.last_step() > u64::from(steps) {
                    tracing::warn!(
                        id = %spec.id,
                        axis = %track.axis(),
                        last_step = track.last_step(),
                        steps,
                        "keyframes run past the configured step count"
                    );
                }
            }
        }

        Ok(AnimationConfig {
            canvas: self.canvas.clone(),
            svg,
            duration_ms,
            steps,
            animations,
        })
    }
}

/// Validated configuration ready to load.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationConfig {
    pub canvas: Option<String>,
    pub svg: String,
    pub duration_ms: f64,
    pub steps: u32,
    pub animations: Vec<AnimationSpec>,
}

impl AnimationConfig {
    /// Milliseconds per step unit.
    pub fn duration_step(&self) -> f64 {
        self.duration_ms / f64::from(self.steps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
