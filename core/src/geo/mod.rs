pub mod graticule;
pub mod projection;
pub mod rotation;

pub use graticule::graticule;
pub use projection::{angular_distance, Projection, Viewport, CLIP_ANGLE};
pub use rotation::Rotation;
