use crate::camera::CameraSnapshot;
use crate::geo::rotation::{geo_from_vector, unit_vector, Rotation};
use crate::prelude::{GeoPoint, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Angular radius of the visible hemisphere.
pub const CLIP_ANGLE: f64 = FRAC_PI_2;

/// Fraction of the short canvas side covered by the globe diameter at scale 1.
const GLOBE_FILL: f64 = 0.9 * 0.45;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Globe radius in pixels at zoom scale 1.
    pub fn base_radius(&self) -> f64 {
        f64::from(self.width.min(self.height)) * GLOBE_FILL
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Orthographic projection of the unit sphere for one camera snapshot.
#[derive(Debug, Clone)]
pub struct Projection {
    rotation: Rotation,
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Projection {
    pub fn new(camera: &CameraSnapshot, viewport: &Viewport) -> Self {
        let center = viewport.center();
        Self {
            rotation: Rotation::from_yaw_pitch(camera.yaw, camera.pitch),
            cx: f64::from(center.x),
            cy: f64::from(center.y),
            radius: viewport.base_radius() * camera.scale,
        }
    }

    /// Pixels per unit of sphere radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.cx as f32, self.cy as f32)
    }

    /// Projects a point, or `None` when it lies on the far hemisphere.
    pub fn project(&self, point: GeoPoint) -> Option<ScreenPoint> {
        let [depth, east, north] = self.rotation.apply(unit_vector(point));
        if depth < 0.0 {
            return None;
        }
        let projected = self.to_screen(east, north);
        projected.is_finite().then_some(projected)
    }

    /// Projects a point, pushing far-side points radially onto the limb.
    pub fn project_to_limb(&self, point: GeoPoint) -> ScreenPoint {
        let [depth, east, north] = self.rotation.apply(unit_vector(point));
        if depth >= 0.0 {
            return self.to_screen(east, north);
        }
        let norm = (east * east + north * north).sqrt();
        if norm <= f64::EPSILON {
            // Antipode of the view center; any limb point is as good.
            return self.to_screen(1.0, 0.0);
        }
        self.to_screen(east / norm, north / norm)
    }

    /// Geographic point under a screen position, if it lies on the globe disc.
    pub fn invert(&self, point: ScreenPoint) -> Option<GeoPoint> {
        let east = (f64::from(point.x) - self.cx) / self.radius;
        let north = -(f64::from(point.y) - self.cy) / self.radius;
        let rho_sq = east * east + north * north;
        if !(rho_sq <= 1.0) {
            return None;
        }
        let depth = (1.0 - rho_sq).sqrt();
        Some(geo_from_vector(self.rotation.invert([depth, east, north])))
    }

    /// Splits a geographic polyline into runs that are fully on the near side.
    pub fn visible_runs(&self, line: &[GeoPoint]) -> Vec<Vec<ScreenPoint>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for point in line {
            match self.project(*point) {
                Some(projected) => current.push(projected),
                None => {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }
        if current.len() > 1 {
            runs.push(current);
        }
        runs
    }

    fn to_screen(&self, east: f64, north: f64) -> ScreenPoint {
        ScreenPoint::new(
            (self.cx + self.radius * east) as f32,
            (self.cy - self.radius * north) as f32,
        )
    }
}

/// Great-circle distance between two points, in radians.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let delta = (b.lon - a.lon).to_radians().abs();
    let (sin_delta, cos_delta) = delta.sin_cos();
    let (sin_a, cos_a) = a.lat.to_radians().sin_cos();
    let (sin_b, cos_b) = b.lat.to_radians().sin_cos();

    let x = cos_b * sin_delta;
    let y = cos_a * sin_b - sin_a * cos_b * cos_delta;
    let z = sin_a * sin_b + cos_a * cos_b * cos_delta;
    (x * x + y * y).sqrt().atan2(z)
}
