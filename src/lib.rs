//! Turns pointer drags into quads packed into flat GPU buffers, drawn with one draw call per frame.

pub(crate) mod util;

pub mod color;
pub mod engine;
pub mod geom;
pub mod render;

mod wgpu_context;
pub use wgpu_context::*;

#[cfg(test)]
pub mod test;

pub use color::Color;
pub use engine::{Canvas, CanvasConfig, StrokeError, StrokeId};
pub use render::{FramePlan, FrameTarget, OffscreenTarget, Resources, StrokeRenderer};
