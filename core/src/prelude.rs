use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Position on the drawing surface, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &ScreenPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Shared tuning for every globe component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub initial_yaw: f64,
    pub initial_pitch: f64,
    pub focus_scale: f64,
    pub zoom_step: f64,
    pub sensitivity: f64,
    pub decay: f64,
    pub stop_threshold: f64,
    pub tick_ms: f64,
    pub label_min_distance: f32,
    pub focus_dim: f32,
    pub ray_scale: f32,
    pub marker_radius: f32,
    pub search_limit: usize,
    pub min_query_len: usize,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            min_pitch: -80.0,
            max_pitch: 80.0,
            initial_yaw: -46.27,
            initial_pitch: -15.20,
            focus_scale: 2.0,
            zoom_step: 0.2,
            sensitivity: 75.0,
            decay: 0.92,
            stop_threshold: 0.005,
            tick_ms: 16.0,
            label_min_distance: 40.0,
            focus_dim: 0.5,
            ray_scale: 60.0,
            marker_radius: 12.0,
            search_limit: 8,
            min_query_len: 2,
        }
    }
}

impl GlobeConfig {
    pub fn validate(&self) -> GlobeResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(GlobeError::InvalidConfig(format!(
                "scale bounds [{}, {}] must be positive and ordered",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_pitch >= -90.0 && self.min_pitch <= self.max_pitch && self.max_pitch <= 90.0)
        {
            return Err(GlobeError::InvalidConfig(format!(
                "pitch bounds [{}, {}] must lie within [-90, 90]",
                self.min_pitch, self.max_pitch
            )));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(GlobeError::InvalidConfig(format!(
                "decay {} must be in (0, 1)",
                self.decay
            )));
        }
        if self.stop_threshold <= 0.0 || self.tick_ms <= 0.0 || self.sensitivity <= 0.0 {
            return Err(GlobeError::InvalidConfig(
                "sensitivity, tick_ms and stop_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Common error type for feed loading and configuration.
#[derive(thiserror::Error, Debug)]
pub enum GlobeError {
    #[error("feed unreadable: {0}")]
    FeedRead(#[from] std::io::Error),
    #[error("feed parse failure: {0}")]
    FeedParse(String),
    #[error("unsupported boundary geometry: {0}")]
    BoundaryFormat(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<csv::Error> for GlobeError {
    fn from(err: csv::Error) -> Self {
        GlobeError::FeedParse(err.to_string())
    }
}

impl From<serde_json::Error> for GlobeError {
    fn from(err: serde_json::Error) -> Self {
        GlobeError::FeedParse(err.to_string())
    }
}

pub type GlobeResult<T> = Result<T, GlobeError>;
