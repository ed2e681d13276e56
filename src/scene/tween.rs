use crate::{
    animation::keyframe::{Axis, KeyframeTrack},
    animation::player::{KeyframePlayer, ScheduledStep, Step, StepKind},
    foundation::error::KeyplayResult,
    svg::document::NodeId,
    svg::groups::TransformGroup,
    toolkit::{SvgToolkit, TweenId},
};

/// Where a tween is in its keyframe list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TweenState {
    /// Snapped to the first pose; no step scheduled yet.
    Ready,
    /// Step `index` is in flight.
    Running { index: usize },
    /// The last step completed. Terminal.
    Finished,
    /// Stopped before the last step completed. Terminal.
    Cancelled,
}

/// A keyframe player bound to one axis group of one element.
#[derive(Clone, Debug)]
pub struct Tween {
    id: TweenId,
    element: NodeId,
    group: NodeId,
    player: KeyframePlayer,
    state: TweenState,
    started_at_ms: Option<f64>,
}

impl Tween {
    /// Resolve the origin from `groups`' axis group, stop whatever is animating on any of the
    /// element's groups, and snap the axis group to keyframe 0.
    pub fn new(
        toolkit: &mut dyn SvgToolkit,
        id: TweenId,
        groups: &TransformGroup,
        track: KeyframeTrack,
        duration_step: f64,
    ) -> KeyplayResult<Self> {
        let axis = track.axis();
        let group = groups.group(axis);
        let bbox = toolkit.bbox(group)?;
        let player = KeyframePlayer::with_bbox(track, duration_step, bbox);

        for g in groups.all() {
            toolkit.stop(g);
        }
        toolkit.set_transform(group, player.initial_value());

        tracing::debug!(
            tween = id.0,
            %axis,
            keyframes = player.track().len(),
            origin_x = player.origin().x,
            origin_y = player.origin().y,
            "tween ready"
        );

        Ok(Self {
            id,
            element: groups.element,
            group,
            player,
            state: TweenState::Ready,
            started_at_ms: None,
        })
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn axis(&self) -> Axis {
        self.player.axis()
    }

    /// The animated element (the wrapper of the group chain).
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The axis group whose transform this tween drives.
    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn player(&self) -> &KeyframePlayer {
        &self.player
    }

    /// Clock time of the first step, once started.
    pub fn started_at_ms(&self) -> Option<f64> {
        self.started_at_ms
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TweenState::Ready | TweenState::Running { .. })
    }

    /// Full step plan on the tween's own clock.
    pub fn schedule(&self) -> Vec<ScheduledStep> {
        self.player.schedule()
    }

    /// Hand the next step to the toolkit.
    ///
    /// Called once to start and then once per completion. Returns `None` and becomes
    /// [`TweenState::Finished`] when the last step has completed; terminal tweens never
    /// schedule again.
    pub fn advance(&mut self, toolkit: &mut dyn SvgToolkit) -> Option<Step> {
        if !self.is_active() {
            return None;
        }
        let Some(step) = self.player.next() else {
            self.state = TweenState::Finished;
            tracing::debug!(tween = self.id.0, axis = %self.axis(), "tween finished");
            return None;
        };

        match step.kind {
            StepKind::Pause => toolkit.delay(step.duration_ms, self.id),
            StepKind::Animate => toolkit.animate(
                self.group,
                step.target,
                step.duration_ms,
                step.ease,
                self.id,
            ),
        }
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(toolkit.now());
        }
        self.state = TweenState::Running { index: step.index };
        tracing::debug!(
            tween = self.id.0,
            axis = %self.axis(),
            index = step.index,
            kind = ?step.kind,
            duration_ms = step.duration_ms,
            ease = step.ease.name(),
            "step scheduled"
        );
        Some(step)
    }

    /// Drop the tween's pending pause or transition and make it terminal. Returns whether it
    /// was still active.
    pub fn cancel(&mut self, toolkit: &mut dyn SvgToolkit) -> bool {
        if !self.is_active() {
            return false;
        }
        toolkit.cancel_token(self.id);
        self.state = TweenState::Cancelled;
        true
    }

    pub(crate) fn mark_cancelled(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = TweenState::Cancelled;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tween.rs"]
mod tests;
