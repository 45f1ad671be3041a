pub mod compositor;
pub mod context;

// Re-export main types
pub use compositor::{FrameCompositor, FrameInputs, ScaleBar};
pub use context::{Color, DrawCommand, RenderContext, StrokeStyle};
