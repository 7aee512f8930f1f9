use crate::prelude::GeoPoint;
use ndarray::{arr1, arr2, Array2};

/// Sphere rotation composed from a yaw about the polar axis followed by a
/// pitch about the view-horizontal axis.
#[derive(Debug, Clone)]
pub struct Rotation {
    matrix: Array2<f64>,
    inverse: Array2<f64>,
}

impl Rotation {
    pub fn from_yaw_pitch(yaw_deg: f64, pitch_deg: f64) -> Self {
        let (sin_yaw, cos_yaw) = yaw_deg.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = pitch_deg.to_radians().sin_cos();

        let yaw = arr2(&[
            [cos_yaw, -sin_yaw, 0.0],
            [sin_yaw, cos_yaw, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let pitch = arr2(&[
            [cos_pitch, 0.0, -sin_pitch],
            [0.0, 1.0, 0.0],
            [sin_pitch, 0.0, cos_pitch],
        ]);

        let matrix = pitch.dot(&yaw);
        // Orthonormal, so the transpose is the inverse.
        let inverse = matrix.t().to_owned();
        Self { matrix, inverse }
    }

    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let out = self.matrix.dot(&arr1(&v));
        [out[0], out[1], out[2]]
    }

    pub fn invert(&self, v: [f64; 3]) -> [f64; 3] {
        let out = self.inverse.dot(&arr1(&v));
        [out[0], out[1], out[2]]
    }
}

/// Unit vector for a geographic point: x towards (0, 0), z towards the north pole.
pub fn unit_vector(point: GeoPoint) -> [f64; 3] {
    let (sin_lon, cos_lon) = point.lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = point.lat.to_radians().sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

pub fn geo_from_vector(v: [f64; 3]) -> GeoPoint {
    GeoPoint::new(
        v[1].atan2(v[0]).to_degrees(),
        v[2].clamp(-1.0, 1.0).asin().to_degrees(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn identity_rotation_leaves_vectors_alone() {
        let rotation = Rotation::from_yaw_pitch(0.0, 0.0);
        let v = unit_vector(GeoPoint::new(12.0, -33.0));
        assert!(close(rotation.apply(v), v));
    }

    #[test]
    fn inverse_undoes_rotation() {
        let rotation = Rotation::from_yaw_pitch(46.27, 15.2);
        let v = unit_vector(GeoPoint::new(-74.01, 40.71));
        assert!(close(rotation.invert(rotation.apply(v)), v));
    }

    #[test]
    fn vector_round_trips_to_geo() {
        let point = geo_from_vector(unit_vector(GeoPoint::new(37.62, 55.75)));
        assert!((point.lon - 37.62).abs() < 1e-9);
        assert!((point.lat - 55.75).abs() < 1e-9);
    }
}
