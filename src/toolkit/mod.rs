//! The SVG-toolkit seam: document loading, selection, geometry queries, transform assignment,
//! timed transitions and a pumped clock.

pub mod stage;

use crate::{
    animation::ease::Ease,
    animation::value::TransformValue,
    foundation::core::Rect,
    foundation::error::KeyplayResult,
    svg::document::{NodeId, SvgDocument},
};

/// Registry index of a tween; used as the completion token for its timers and transitions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TweenId(pub usize);

/// A timer or transition that reached its deadline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Completion {
    pub token: TweenId,
    pub at_ms: f64,
}

/// Operations the scene loader and tweens need from an SVG host.
pub trait SvgToolkit {
    fn document(&self) -> &SvgDocument;

    fn document_mut(&mut self) -> &mut SvgDocument;

    /// Parse `svg` and append its root element under `container`. Returns the appended root.
    fn load(&mut self, container: NodeId, svg: &[u8]) -> KeyplayResult<NodeId>;

    /// First descendant of `scope` matching `selector`.
    fn select(&self, scope: NodeId, selector: &str) -> KeyplayResult<Option<NodeId>>;

    /// Bounding box of `node`'s content in `node`'s user space.
    fn bbox(&self, node: NodeId) -> KeyplayResult<Rect>;

    /// Current transform value last assigned or sampled on `node`.
    fn transform(&self, node: NodeId) -> Option<TransformValue>;

    /// Assign a transform immediately, without animation.
    fn set_transform(&mut self, node: NodeId, value: TransformValue);

    /// Transition `node` from its current transform to `to`; `token` completes at the end.
    fn animate(
        &mut self,
        node: NodeId,
        to: TransformValue,
        duration_ms: f64,
        ease: Ease,
        token: TweenId,
    );

    /// Complete `token` after `duration_ms`.
    fn delay(&mut self, duration_ms: f64, token: TweenId);

    /// Cancel in-flight transitions on `node`. Their tokens never complete.
    fn stop(&mut self, node: NodeId);

    /// Cancel every pending timer and transition scheduled with `token`. None of them completes.
    fn cancel_token(&mut self, token: TweenId);

    /// Drain tokens cancelled by [`SvgToolkit::stop`] or [`SvgToolkit::cancel_token`] since the
    /// last call.
    fn take_cancelled(&mut self) -> Vec<TweenId>;

    fn now(&self) -> f64;

    /// Earliest pending timer or transition end.
    fn next_deadline(&self) -> Option<f64>;

    /// Move the clock to `t_ms`, firing everything due (earliest first) and sampling running
    /// transitions at `t_ms`.
    fn advance_to(&mut self, t_ms: f64) -> Vec<Completion>;
}
