use crate::{
    scene::tween::{Tween, TweenState},
    toolkit::{Completion, SvgToolkit, TweenId},
};

/// Something observable that happened during playback.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    StepStarted {
        tween: TweenId,
        index: usize,
        at_ms: f64,
    },
    Finished {
        tween: TweenId,
        at_ms: f64,
    },
    Cancelled {
        tween: TweenId,
        at_ms: f64,
    },
}

impl PlaybackEvent {
    pub fn tween(&self) -> TweenId {
        match *self {
            Self::StepStarted { tween, .. }
            | Self::Finished { tween, .. }
            | Self::Cancelled { tween, .. } => tween,
        }
    }

    pub fn at_ms(&self) -> f64 {
        match *self {
            Self::StepStarted { at_ms, .. }
            | Self::Finished { at_ms, .. }
            | Self::Cancelled { at_ms, .. } => at_ms,
        }
    }
}

/// Routes toolkit completions to the tweens that own them.
///
/// The clock is advanced one deadline at a time, so a step scheduled in response to a
/// completion starts exactly at that completion's time.
#[derive(Clone, Debug, Default)]
pub struct Playback {
    tweens: Vec<Tween>,
    pending: Vec<PlaybackEvent>,
}

impl Playback {
    /// Take over `tweens`. Tweens already started report their first step on the next
    /// [`Playback::advance_to`]; tweens still ready are started then.
    pub fn new(tweens: Vec<Tween>) -> Self {
        let pending = tweens
            .iter()
            .filter_map(|t| match (t.state(), t.started_at_ms()) {
                (TweenState::Running { index }, Some(at_ms)) => {
                    Some(PlaybackEvent::StepStarted {
                        tween: t.id(),
                        index,
                        at_ms,
                    })
                }
                _ => None,
            })
            .collect();
        Self { tweens, pending }
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn tween(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.id() == id)
    }

    /// Whether every tween has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.tweens.iter().all(|t| !t.is_active())
    }

    /// Length of the longest tween.
    pub fn total_duration_ms(&self) -> f64 {
        self.tweens
            .iter()
            .map(|t| t.player().total_duration_ms())
            .fold(0.0, f64::max)
    }

    /// Advance the toolkit clock to `t_ms`, driving every tween along the way.
    pub fn advance_to(&mut self, toolkit: &mut dyn SvgToolkit, t_ms: f64) -> Vec<PlaybackEvent> {
        let mut events = std::mem::take(&mut self.pending);
        self.start_ready(toolkit, &mut events);

        while let Some(deadline) = toolkit.next_deadline().filter(|d| *d <= t_ms) {
            let completions = toolkit.advance_to(deadline);
            self.route(toolkit, completions, &mut events);
        }
        let completions = toolkit.advance_to(t_ms);
        self.route(toolkit, completions, &mut events);
        events
    }

    /// Advance until no tween is active or nothing is left to wait for.
    pub fn run_to_end(&mut self, toolkit: &mut dyn SvgToolkit) -> Vec<PlaybackEvent> {
        let now = toolkit.now();
        let mut events = self.advance_to(toolkit, now);
        while !self.is_finished() {
            let Some(deadline) = toolkit.next_deadline() else {
                break;
            };
            events.extend(self.advance_to(toolkit, deadline));
        }
        events
    }

    /// Stop one tween. Returns the cancellation event when the tween was still active.
    pub fn cancel(&mut self, toolkit: &mut dyn SvgToolkit, id: TweenId) -> Option<PlaybackEvent> {
        let tween = self.tweens.iter_mut().find(|t| t.id() == id)?;
        if !tween.cancel(toolkit) {
            return None;
        }
        tracing::debug!(tween = id.0, "tween cancelled");
        Some(PlaybackEvent::Cancelled {
            tween: id,
            at_ms: toolkit.now(),
        })
    }

    fn start_ready(&mut self, toolkit: &mut dyn SvgToolkit, events: &mut Vec<PlaybackEvent>) {
        let at_ms = toolkit.now();
        for tween in &mut self.tweens {
            if tween.state() != TweenState::Ready {
                continue;
            }
            let event = match tween.advance(toolkit) {
                Some(step) => PlaybackEvent::StepStarted {
                    tween: tween.id(),
                    index: step.index,
                    at_ms,
                },
                None => PlaybackEvent::Finished {
                    tween: tween.id(),
                    at_ms,
                },
            };
            events.push(event);
        }
    }

    fn route(
        &mut self,
        toolkit: &mut dyn SvgToolkit,
        completions: Vec<Completion>,
        events: &mut Vec<PlaybackEvent>,
    ) {
        for c in completions {
            let Some(tween) = self.tweens.iter_mut().find(|t| t.id() == c.token) else {
                continue;
            };
            if !tween.is_active() {
                continue;
            }
            let event = match tween.advance(toolkit) {
                Some(step) => PlaybackEvent::StepStarted {
                    tween: c.token,
                    index: step.index,
                    at_ms: c.at_ms,
                },
                None => PlaybackEvent::Finished {
                    tween: c.token,
                    at_ms: c.at_ms,
                },
            };
            events.push(event);
        }

        let at_ms = toolkit.now();
        for token in toolkit.take_cancelled() {
            if let Some(tween) = self.tweens.iter_mut().find(|t| t.id() == token)
                && tween.mark_cancelled()
            {
                events.push(PlaybackEvent::Cancelled {
                    tween: token,
                    at_ms,
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/playback.rs"]
mod tests;
