//! keyplay plays JSON-described keyframe animations on SVG illustrations.
//!
//! An animation description names elements of an SVG by selector and gives each element up to
//! three keyframe lists, one per transform axis (translate, rotate, scale). Loading wraps each
//! named element's content in a `translate > rotate > scale` group chain so the axes compose
//! independently, then starts one tween per list.
//!
//! # Pipeline overview
//!
//! 1. **Config**: [`SceneLoader::load_config`] fetches the JSON and merges it over the caller's
//!    [`PlayerOptions`] into a validated [`AnimationConfig`].
//! 2. **Scene**: [`SceneLoader::load_scene`] appends the SVG to the canvas of an [`SvgToolkit`].
//! 3. **Animations**: [`SceneLoader::attach_animations`] decomposes every animated element and
//!    starts a [`Tween`] per keyframe list.
//! 4. **Playback**: [`Playback::advance_to`] pumps the toolkit clock and routes completions.
//! 5. **Output** (optional): SVG snapshots from [`Stage::to_svg_string`] or pixels from
//!    [`render_stage`].
//!
//! [`Stage`] is the bundled toolkit: an in-memory SVG document with a virtual clock. Nothing
//! moves until the caller advances it, so playback is deterministic.
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod render;
mod scene;
mod svg;
mod toolkit;

pub use animation::ease::Ease;
pub use animation::keyframe::{
    AnchorX, AnchorY, Axis, Key, Keyframe, KeyframeSet, KeyframeTrack,
};
pub use animation::player::{KeyframePlayer, ScheduledStep, Step, StepKind, resolve_origin};
pub use animation::value::{Pose, TransformValue};
pub use foundation::core::{Affine, CanvasSize, Point, Rect, Vec2, fmt_num};
pub use foundation::error::{KeyplayError, KeyplayResult};
pub use render::raster::{Frame, RasterSettings, render_document, render_stage, save_png};
#[cfg(feature = "http")]
pub use scene::fetch::HttpFetch;
pub use scene::config::{AnimationConfig, AnimationSpec, PlayerOptions};
pub use scene::fetch::{Fetch, FsFetch, fetch_json, is_http_url};
pub use scene::loader::{SceneHandle, SceneLoader, SvgAnimation};
pub use scene::playback::{Playback, PlaybackEvent};
pub use scene::tween::{Tween, TweenState};
pub use svg::bbox::local_bbox;
pub use svg::document::{NodeId, SVG_NS, SvgDocument, XLINK_NS};
pub use svg::groups::{TransformGroup, decompose};
pub use svg::select::Selector;
pub use toolkit::stage::Stage;
pub use toolkit::{Completion, SvgToolkit, TweenId};
