use crate::{
    animation::keyframe::Axis,
    foundation::error::KeyplayResult,
    svg::document::{NodeId, SvgDocument},
};

/// The `translate > rotate > scale` chain wrapped around an element's original content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformGroup {
    pub element: NodeId,
    pub translate: NodeId,
    pub rotate: NodeId,
    pub scale: NodeId,
}

impl TransformGroup {
    pub fn group(&self, axis: Axis) -> NodeId {
        match axis {
            Axis::Translate => self.translate,
            Axis::Rotate => self.rotate,
            Axis::Scale => self.scale,
        }
    }

    /// The three groups, outermost first.
    pub fn all(&self) -> [NodeId; 3] {
        [self.translate, self.rotate, self.scale]
    }
}

/// Move `element`'s children into a fresh `translate > rotate > scale` group chain.
///
/// Children keep their order, attributes and subtrees. Returns `Ok(None)` without touching the
/// document when `element` is a text node. A second call on the same element nests another chain.
pub fn decompose(doc: &mut SvgDocument, element: NodeId) -> KeyplayResult<Option<TransformGroup>> {
    if !doc.is_element(element) {
        tracing::debug!(node = %doc.describe(element), "not an element, skipping transform groups");
        return Ok(None);
    }

    let [translate, rotate, scale] = Axis::ALL.map(|axis| {
        let g = doc.create_element("g");
        doc.set_attr(g, "class", axis.class_name());
        g
    });

    for child in doc.take_children(element) {
        doc.append_child(scale, child)?;
    }
    doc.append_child(rotate, scale)?;
    doc.append_child(translate, rotate)?;
    doc.append_child(element, translate)?;

    Ok(Some(TransformGroup {
        element,
        translate,
        rotate,
        scale,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/svg/groups.rs"]
mod tests;
