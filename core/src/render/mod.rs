pub mod globe;
pub mod markers;
pub mod surface;
pub mod transition;

pub use globe::{draw_globe, GlobePalette};
pub use markers::{draw_markers, marker_color, ray_color, ray_length, MarkerHighlight, MarkerStyle};
pub use surface::{Color, DrawCommand, RecordingSurface, RenderSurface, Stroke, TextLabel};
pub use transition::RayReveal;
