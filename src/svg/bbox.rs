use std::sync::{Arc, OnceLock};

use crate::{
    foundation::core::Rect,
    foundation::error::{KeyplayError, KeyplayResult},
    svg::document::{NodeId, SvgDocument},
};

/// usvg options sharing one system font database per process.
pub(crate) fn usvg_options() -> usvg::Options<'static> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    let fontdb = FONTS.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    });
    usvg::Options {
        fontdb: Arc::clone(fontdb),
        ..usvg::Options::default()
    }
}

const MEASURE_ID: &str = "keyplay-bbox-measure";

/// Bounding box of `node`'s content in `node`'s own user space.
///
/// Children's `transform` attributes are applied; `node`'s own transform and its ancestors' are
/// not. Fill geometry only, strokes excluded. An element without element children, or one that is
/// not rendered, has a zero box at the origin.
///
/// The content is measured in place: a copy of the whole document gets an untransformed `<g>`
/// between `node` and its children, so inherited properties, stylesheets and references all
/// apply as they do when rendering.
pub fn local_bbox(doc: &SvgDocument, node: NodeId) -> KeyplayResult<Rect> {
    if doc.element_children(node).next().is_none() {
        return Ok(Rect::ZERO);
    }

    let mut measured = doc.clone();
    let wrapper = measured.create_element("g");
    measured.set_attr(wrapper, "id", MEASURE_ID);
    for child in measured.take_children(node) {
        measured.append_child(wrapper, child)?;
    }
    measured.append_child(node, wrapper)?;

    let tree = usvg::Tree::from_str(&measured.to_svg_string(), &usvg_options())
        .map_err(|e| KeyplayError::svg(format!("bbox of {}: {e}", doc.describe(node))))?;
    let Some(usvg::Node::Group(group)) = tree.node_by_id(MEASURE_ID) else {
        tracing::debug!(node = %doc.describe(node), "content not rendered, zero bbox");
        return Ok(Rect::ZERO);
    };
    let r = group.bounding_box();
    Ok(Rect::new(
        f64::from(r.left()),
        f64::from(r.top()),
        f64::from(r.right()),
        f64::from(r.bottom()),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/svg/bbox.rs"]
mod tests;
