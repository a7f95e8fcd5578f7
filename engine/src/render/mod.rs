// Annotation overlay rendering.
pub mod renderer;
pub mod shapes;
pub mod surface;

pub use renderer::{OverlayRenderer, RedrawHandle, RenderReport, MAX_RENDER_PASSES};
pub use surface::{DrawCommand, OverlaySurface, RecordingSurface, StrokeStyle};
