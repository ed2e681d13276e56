use std::collections::HashMap;

use crate::{
    animation::ease::Ease,
    animation::value::TransformValue,
    foundation::core::{CanvasSize, Rect},
    foundation::error::{KeyplayError, KeyplayResult},
    svg::{
        bbox::local_bbox,
        document::{NodeId, SvgDocument},
        select::Selector,
    },
    toolkit::{Completion, SvgToolkit, TweenId},
};

#[derive(Clone, Copy, Debug)]
struct Timer {
    due_ms: f64,
    seq: u64,
    token: TweenId,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    node: NodeId,
    from: TransformValue,
    to: TransformValue,
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
    seq: u64,
    token: TweenId,
}

impl Transition {
    fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    fn sample(&self, t_ms: f64) -> TransformValue {
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (t_ms - self.start_ms) / self.duration_ms
        };
        self.from.lerp(self.to, self.ease.apply(progress))
    }
}

enum Due {
    Timer(usize),
    Transition(usize),
}

/// In-memory SVG host: a canvas document plus a virtual millisecond clock.
///
/// Nothing moves until [`SvgToolkit::advance_to`] is called. Events due at the same instant fire
/// in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct Stage {
    doc: SvgDocument,
    size: CanvasSize,
    clock_ms: f64,
    seq: u64,
    timers: Vec<Timer>,
    transitions: Vec<Transition>,
    values: HashMap<NodeId, TransformValue>,
    cancelled: Vec<TweenId>,
}

impl Stage {
    /// An empty canvas of `size`.
    pub fn new(size: CanvasSize) -> Self {
        Self::with_document(SvgDocument::new_canvas(size), size)
    }

    /// Use an existing host document (for example a page mock-up) as the canvas.
    pub fn from_document(doc: SvgDocument) -> KeyplayResult<Self> {
        let (w, h) = doc
            .size()
            .ok_or_else(|| KeyplayError::validation("canvas document has no width/height or viewBox"))?;
        let size = CanvasSize::new(w.ceil() as u32, h.ceil() as u32)?;
        Ok(Self::with_document(doc, size))
    }

    fn with_document(doc: SvgDocument, size: CanvasSize) -> Self {
        Self {
            doc,
            size,
            clock_ms: 0.0,
            seq: 0,
            timers: Vec::new(),
            transitions: Vec::new(),
            values: HashMap::new(),
            cancelled: Vec::new(),
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn to_svg_string(&self) -> String {
        self.doc.to_svg_string()
    }

    pub fn running_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether `node` has a transition in flight.
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.transitions.iter().any(|tr| tr.node == node)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn write(&mut self, node: NodeId, value: TransformValue) {
        self.values.insert(node, value);
        self.doc.set_attr(node, "transform", value.to_svg());
    }

    fn earliest_due(&self, limit_ms: f64) -> Option<Due> {
        let timers = self
            .timers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.due_ms, t.seq, Due::Timer(i)));
        let transitions = self
            .transitions
            .iter()
            .enumerate()
            .map(|(i, tr)| (tr.end_ms(), tr.seq, Due::Transition(i)));
        timers
            .chain(transitions)
            .filter(|(due, _, _)| *due <= limit_ms)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, _, due)| due)
    }
}

impl SvgToolkit for Stage {
    fn document(&self) -> &SvgDocument {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut SvgDocument {
        &mut self.doc
    }

    fn load(&mut self, container: NodeId, svg: &[u8]) -> KeyplayResult<NodeId> {
        let loaded = SvgDocument::parse_bytes(svg)?;
        let root = self.doc.import(&loaded, loaded.root());
        self.doc.append_child(container, root)?;
        tracing::debug!(
            container = %self.doc.describe(container),
            bytes = svg.len(),
            "svg appended to canvas"
        );
        Ok(root)
    }

    fn select(&self, scope: NodeId, selector: &str) -> KeyplayResult<Option<NodeId>> {
        Ok(Selector::parse(selector)?.select_first(&self.doc, scope))
    }

    fn bbox(&self, node: NodeId) -> KeyplayResult<Rect> {
        local_bbox(&self.doc, node)
    }

    fn transform(&self, node: NodeId) -> Option<TransformValue> {
        self.values.get(&node).copied()
    }

    fn set_transform(&mut self, node: NodeId, value: TransformValue) {
        self.write(node, value);
    }

    fn animate(
        &mut self,
        node: NodeId,
        to: TransformValue,
        duration_ms: f64,
        ease: Ease,
        token: TweenId,
    ) {
        // A node carries one transition at a time; a new one takes over from the current pose.
        self.stop(node);
        let from = self
            .transform(node)
            .filter(|v| v.axis() == to.axis())
            .unwrap_or_else(|| to.identity_like());
        let seq = self.next_seq();
        self.transitions.push(Transition {
            node,
            from,
            to,
            start_ms: self.clock_ms,
            duration_ms: duration_ms.max(0.0),
            ease,
            seq,
            token,
        });
    }

    fn delay(&mut self, duration_ms: f64, token: TweenId) {
        let seq = self.next_seq();
        self.timers.push(Timer {
            due_ms: self.clock_ms + duration_ms.max(0.0),
            seq,
            token,
        });
    }

    fn stop(&mut self, node: NodeId) {
        let cancelled = &mut self.cancelled;
        self.transitions.retain(|tr| {
            if tr.node == node {
                cancelled.push(tr.token);
                false
            } else {
                true
            }
        });
    }

    fn cancel_token(&mut self, token: TweenId) {
        let before = self.timers.len() + self.transitions.len();
        self.timers.retain(|t| t.token != token);
        self.transitions.retain(|tr| tr.token != token);
        if self.timers.len() + self.transitions.len() < before {
            self.cancelled.push(token);
        }
    }

    fn take_cancelled(&mut self) -> Vec<TweenId> {
        std::mem::take(&mut self.cancelled)
    }

    fn now(&self) -> f64 {
        self.clock_ms
    }

    fn next_deadline(&self) -> Option<f64> {
        let timers = self.timers.iter().map(|t| t.due_ms);
        let transitions = self.transitions.iter().map(Transition::end_ms);
        timers.chain(transitions).min_by(f64::total_cmp)
    }

    fn advance_to(&mut self, t_ms: f64) -> Vec<Completion> {
        let target = t_ms.max(self.clock_ms);
        let mut fired = Vec::new();

        while let Some(due) = self.earliest_due(target) {
            match due {
                Due::Timer(i) => {
                    let timer = self.timers.remove(i);
                    self.clock_ms = timer.due_ms;
                    fired.push(Completion {
                        token: timer.token,
                        at_ms: timer.due_ms,
                    });
                }
                Due::Transition(i) => {
                    let tr = self.transitions.remove(i);
                    self.clock_ms = tr.end_ms();
                    self.write(tr.node, tr.to);
                    fired.push(Completion {
                        token: tr.token,
                        at_ms: tr.end_ms(),
                    });
                }
            }
        }

        self.clock_ms = target;
        let sampled: Vec<(NodeId, TransformValue)> = self
            .transitions
            .iter()
            .map(|tr| (tr.node, tr.sample(target)))
            .collect();
        for (node, value) in sampled {
            self.write(node, value);
        }
        fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/toolkit/stage.rs"]
mod tests;
