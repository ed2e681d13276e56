use crate::foundation::error::{KeyplayError, KeyplayResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel size of the canvas document that receives loaded illustrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> KeyplayResult<Self> {
        if width == 0 || height == 0 {
            return Err(KeyplayError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Format a number for an SVG attribute: at most four decimals, no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
