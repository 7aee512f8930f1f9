//! Headless core of the sustainability globe.
//!
//! Cities are projected orthographically onto a rotating sphere, culled to
//! the near hemisphere, decluttered and drawn as score markers onto any
//! [`render::RenderSurface`]. [`view::GlobeView`] ties the pieces together
//! for an interactive host; every other module is usable on its own.

pub mod camera;
pub mod data;
pub mod geo;
pub mod interaction;
pub mod layout;
pub mod prelude;
pub mod render;
pub mod search;
pub mod telemetry;
pub mod view;

pub use camera::{CameraSnapshot, CameraState};
pub use data::{Boundary, City};
pub use layout::{compute_layout, LayoutEntry, LayoutParams};
pub use prelude::{GeoPoint, GlobeConfig, GlobeError, GlobeResult, ScreenPoint};
pub use view::{GlobeView, InputEvent};
