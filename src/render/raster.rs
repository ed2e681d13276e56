use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::CanvasSize,
    foundation::error::{KeyplayError, KeyplayResult},
    svg::bbox::usvg_options,
    svg::document::SvgDocument,
    toolkit::{SvgToolkit as _, stage::Stage},
};

/// Raster options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterSettings {
    /// Background painted before the document; transparent when `None`.
    pub clear_rgba: Option<[u8; 4]>,
}

/// A rendered frame in straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Render the stage's canvas at its current playback time.
pub fn render_stage(stage: &Stage, settings: RasterSettings) -> KeyplayResult<Frame> {
    render_document(stage.document(), stage.size(), settings)
}

/// Render `doc` into a `size` pixel frame, scaling the document's own size to fit.
pub fn render_document(
    doc: &SvgDocument,
    size: CanvasSize,
    settings: RasterSettings,
) -> KeyplayResult<Frame> {
    let text = doc.to_svg_string();
    let tree = usvg::Tree::from_str(&text, &usvg_options())
        .map_err(|e| KeyplayError::svg(format!("parse canvas for raster: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
        .ok_or_else(|| KeyplayError::svg("failed to allocate pixmap"))?;
    if let Some([r, g, b, a]) = settings.clear_rgba {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let sx = size.width as f32 / tree.size().width();
    let sy = size.height as f32 / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(Frame {
        width: size.width,
        height: size.height,
        data,
    })
}

/// Write `frame` as a PNG, creating the parent directory when needed.
pub fn save_png(frame: &Frame, path: &Path) -> KeyplayResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
