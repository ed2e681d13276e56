//! Loading an animation description onto a toolkit and playing it back.

pub mod config;
pub mod fetch;
pub mod loader;
pub mod playback;
pub mod tween;
