//! The single mutable view camera.
//!
//! Rotation and scale only ever change through the methods below, which
//! clamp instead of rejecting. Layout passes work on a [`CameraSnapshot`]
//! copied out before the pass starts.

use crate::prelude::{GeoPoint, GlobeConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
}

impl CameraBounds {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            min_pitch: config.min_pitch,
            max_pitch: config.max_pitch,
        }
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn clamp_pitch(&self, pitch: f64) -> f64 {
        pitch.clamp(self.min_pitch, self.max_pitch)
    }
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self::from_config(&GlobeConfig::default())
    }
}

/// Immutable copy of the camera for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub yaw: f64,
    pub pitch: f64,
    pub scale: f64,
}

impl CameraSnapshot {
    /// Geographic point currently facing the viewer.
    pub fn forward_point(&self) -> GeoPoint {
        GeoPoint::new(normalize_yaw(-self.yaw), -self.pitch)
    }
}

#[derive(Debug, Clone)]
pub struct CameraState {
    yaw: f64,
    pitch: f64,
    scale: f64,
    bounds: CameraBounds,
}

impl CameraState {
    pub fn new(bounds: CameraBounds) -> Self {
        Self {
            yaw: 0.0,
            pitch: bounds.clamp_pitch(0.0),
            scale: bounds.clamp_scale(1.0),
            bounds,
        }
    }

    pub fn from_config(config: &GlobeConfig) -> Self {
        let mut camera = Self::new(CameraBounds::from_config(config));
        camera.set_rotation(config.initial_yaw, config.initial_pitch);
        camera
    }

    pub fn bounds(&self) -> CameraBounds {
        self.bounds
    }

    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        if !(d_yaw.is_finite() && d_pitch.is_finite()) {
            return;
        }
        self.yaw = normalize_yaw(self.yaw + d_yaw);
        self.pitch = self.bounds.clamp_pitch(self.pitch + d_pitch);
    }

    pub fn set_rotation(&mut self, yaw: f64, pitch: f64) {
        if !(yaw.is_finite() && pitch.is_finite()) {
            return;
        }
        self.yaw = normalize_yaw(yaw);
        self.pitch = self.bounds.clamp_pitch(pitch);
    }

    pub fn zoom_to(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = self.bounds.clamp_scale(scale);
        }
    }

    /// Additive step, as used by the zoom buttons.
    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom_to(self.scale + delta);
    }

    /// Multiplicative step, as used by wheel and pinch input.
    pub fn zoom_by_factor(&mut self, factor: f64) {
        if factor > 0.0 {
            self.zoom_to(self.scale * factor);
        }
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_to(1.0);
    }

    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            yaw: self.yaw,
            pitch: self.pitch,
            scale: self.scale,
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraBounds::default())
    }
}

/// Wraps a yaw angle into `[-180, 180)`.
pub fn normalize_yaw(yaw: f64) -> f64 {
    if (-180.0..180.0).contains(&yaw) {
        return yaw;
    }
    let wrapped = (yaw + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_stays_clamped_after_many_rotations() {
        let mut camera = CameraState::default();
        for step in 0..500 {
            let d = if step % 3 == 0 { -37.5 } else { 23.25 };
            camera.rotate(d * 1.7, d);
            let snap = camera.snapshot();
            assert!(snap.pitch >= -80.0 && snap.pitch <= 80.0);
            assert!(snap.yaw >= -180.0 && snap.yaw < 180.0);
        }
    }

    #[test]
    fn yaw_wraps_around() {
        assert_eq!(normalize_yaw(190.0), -170.0);
        assert_eq!(normalize_yaw(-190.0), 170.0);
        assert_eq!(normalize_yaw(180.0), -180.0);
        assert_eq!(normalize_yaw(720.5), 0.5);
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let mut camera = CameraState::default();
        for scale in [10.0, -4.0, 0.0, 2.5, 0.1, f64::NAN, 3.0001] {
            camera.zoom_to(scale);
            let snap = camera.snapshot();
            assert!(snap.scale >= 0.5 && snap.scale <= 3.0, "scale {}", snap.scale);
        }
        camera.zoom_to(2.5);
        assert_eq!(camera.snapshot().scale, 2.5);
    }

    #[test]
    fn zoom_steps_and_reset() {
        let mut camera = CameraState::default();
        camera.zoom_by(0.2);
        assert!((camera.snapshot().scale - 1.2).abs() < 1e-12);
        camera.zoom_by_factor(10.0);
        assert_eq!(camera.snapshot().scale, 3.0);
        camera.reset_zoom();
        assert_eq!(camera.snapshot().scale, 1.0);
    }

    #[test]
    fn set_rotation_round_trips_through_snapshot() {
        let mut camera = CameraState::default();
        camera.zoom_to(1.4);
        camera.set_rotation(270.0, -95.0);
        let snap = camera.snapshot();
        assert_eq!(snap.yaw, -90.0);
        assert_eq!(snap.pitch, -80.0);
        assert_eq!(snap.scale, 1.4);

        camera.set_rotation(0.13, -51.51);
        let snap = camera.snapshot();
        assert_eq!(snap.yaw, 0.13);
        assert_eq!(snap.pitch, -51.51);
    }

    #[test]
    fn config_sets_initial_rotation() {
        let camera = CameraState::from_config(&GlobeConfig::default());
        let snap = camera.snapshot();
        assert!((snap.yaw + 46.27).abs() < 1e-9);
        assert!((snap.pitch + 15.2).abs() < 1e-9);
        let forward = snap.forward_point();
        assert!((forward.lon - 46.27).abs() < 1e-9);
        assert!((forward.lat - 15.2).abs() < 1e-9);
    }
}
