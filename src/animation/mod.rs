pub mod ease;
pub mod keyframe;
pub mod player;
pub mod value;
