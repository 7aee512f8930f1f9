//! Per-frame visibility and label placement.
//!
//! [`compute_layout`] is a pure function of the city list, a camera
//! snapshot, the viewport and the current selection. Label decluttering is
//! a greedy O(n²) scan over already placed labels, fine for a few hundred
//! cities; a spatial index would be needed beyond that.

use crate::camera::CameraSnapshot;
use crate::data::City;
use crate::geo::{angular_distance, Projection, Viewport, CLIP_ANGLE};
use crate::prelude::{GlobeConfig, ScreenPoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Minimum label separation in pixels at zoom scale 1.
    pub label_min_distance: f32,
    /// Opacity multiplier for unselected cities while one is selected.
    pub focus_dim: f32,
}

impl LayoutParams {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            label_min_distance: config.label_min_distance,
            focus_dim: config.focus_dim,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_config(&GlobeConfig::default())
    }
}

/// Placement of one visible city for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Index into the city list the layout was computed from.
    pub index: usize,
    pub name: String,
    pub position: ScreenPoint,
    pub opacity: f32,
    /// Angular distance from the view center, in radians.
    pub distance: f64,
    pub label_shown: bool,
    pub selected: bool,
}

pub fn compute_layout(
    cities: &[City],
    camera: &CameraSnapshot,
    viewport: &Viewport,
    selected: Option<&str>,
    params: &LayoutParams,
) -> Vec<LayoutEntry> {
    let projection = Projection::new(camera, viewport);
    let forward = camera.forward_point();

    let mut entries: Vec<LayoutEntry> = cities
        .iter()
        .enumerate()
        .filter_map(|(index, city)| {
            let distance = angular_distance(city.position(), forward);
            if !(distance <= CLIP_ANGLE) {
                return None;
            }
            let position = projection.project(city.position())?;

            let is_selected = selected == Some(city.name.as_str());
            let falloff = (1.0 - distance / CLIP_ANGLE) as f32;
            let opacity = match selected {
                Some(_) if is_selected => 1.0,
                Some(_) => params.focus_dim * falloff,
                None => falloff,
            };

            Some(LayoutEntry {
                index,
                name: city.name.clone(),
                position,
                opacity: opacity.clamp(0.0, 1.0),
                distance,
                label_shown: false,
                selected: is_selected,
            })
        })
        .collect();

    // Stable, so equal distances keep input order.
    entries.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let min_separation = params.label_min_distance / camera.scale as f32;
    place_labels(&mut entries, min_separation);
    entries
}

/// Greedy decluttering, nearest cities first. The selected city is placed
/// before anything else and regardless of crowding.
fn place_labels(entries: &mut [LayoutEntry], min_separation: f32) {
    let mut placed: Vec<ScreenPoint> = Vec::with_capacity(entries.len());

    if let Some(entry) = entries.iter_mut().find(|entry| entry.selected) {
        entry.label_shown = true;
        placed.push(entry.position);
    }

    for entry in entries.iter_mut().filter(|entry| !entry.selected) {
        let clear = placed
            .iter()
            .all(|other| other.distance(&entry.position) >= min_separation);
        if clear {
            entry.label_shown = true;
            placed.push(entry.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SubMetrics;

    fn city(name: &str, lon: f64, lat: f64) -> City {
        City {
            name: name.to_string(),
            longitude: lon,
            latitude: lat,
            metrics: SubMetrics::default(),
            overall: 50.0,
        }
    }

    fn crowded_grid() -> Vec<City> {
        let mut cities = Vec::new();
        for lon in (-60..=60).step_by(3) {
            for lat in (-39..=39).step_by(3) {
                cities.push(city(&format!("c{lon}_{lat}"), lon as f64, lat as f64));
            }
        }
        cities
    }

    fn snapshot(yaw: f64, pitch: f64, scale: f64) -> CameraSnapshot {
        CameraSnapshot { yaw, pitch, scale }
    }

    #[test]
    fn only_near_hemisphere_cities_are_laid_out() {
        let cities = vec![
            city("front", 10.0, 10.0),
            city("edge", 89.0, 0.0),
            city("back", 120.0, 0.0),
            city("antipode", 180.0, 0.0),
        ];
        let layout = compute_layout(
            &cities,
            &snapshot(0.0, 0.0, 1.0),
            &Viewport::default(),
            None,
            &LayoutParams::default(),
        );
        let names: Vec<&str> = layout.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["front", "edge"]);
        assert!(layout.iter().all(|e| e.distance <= CLIP_ANGLE));
    }

    #[test]
    fn opacity_falls_off_with_distance() {
        let cities = vec![city("far", 60.0, 0.0), city("center", 0.0, 0.0)];
        let layout = compute_layout(
            &cities,
            &snapshot(0.0, 0.0, 1.0),
            &Viewport::default(),
            None,
            &LayoutParams::default(),
        );
        assert_eq!(layout[0].name, "center");
        assert_eq!(layout[0].opacity, 1.0);
        assert!((layout[1].opacity - (1.0 - 60.0 / 90.0)).abs() < 1e-5);
    }

    #[test]
    fn selection_dims_everything_else() {
        let cities = vec![city("center", 0.0, 0.0), city("chosen", 45.0, 0.0)];
        let layout = compute_layout(
            &cities,
            &snapshot(0.0, 0.0, 1.0),
            &Viewport::default(),
            Some("chosen"),
            &LayoutParams::default(),
        );
        let center = layout.iter().find(|e| e.name == "center").unwrap();
        let chosen = layout.iter().find(|e| e.name == "chosen").unwrap();
        assert_eq!(chosen.opacity, 1.0);
        assert!(chosen.selected);
        assert!((center.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn placed_labels_respect_minimum_separation() {
        let cities = crowded_grid();
        let params = LayoutParams::default();
        for (yaw, pitch, scale) in [(0.0, 0.0, 1.0), (-20.0, 10.0, 2.0), (35.0, -25.0, 3.0)] {
            let camera = snapshot(yaw, pitch, scale);
            let layout = compute_layout(&cities, &camera, &Viewport::default(), None, &params);
            let placed: Vec<&LayoutEntry> = layout.iter().filter(|e| e.label_shown).collect();
            assert!(placed.len() > 1);
            let min = params.label_min_distance / scale as f32;
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    assert!(a.position.distance(&b.position) >= min);
                }
            }
        }
    }

    #[test]
    fn zooming_in_shows_more_labels() {
        let cities = crowded_grid();
        let params = LayoutParams::default();
        let count = |scale: f64| {
            compute_layout(&cities, &snapshot(0.0, 0.0, scale), &Viewport::default(), None, &params)
                .iter()
                .filter(|e| e.label_shown)
                .count()
        };
        assert!(count(3.0) > count(1.0));
    }

    #[test]
    fn selected_label_is_always_shown() {
        let mut cities = crowded_grid();
        // Squeeze the selection right next to an already crowded city.
        cities.push(city("chosen", 0.1, 0.1));
        let layout = compute_layout(
            &cities,
            &snapshot(0.0, 0.0, 1.0),
            &Viewport::default(),
            Some("chosen"),
            &LayoutParams::default(),
        );
        let chosen = layout.iter().find(|e| e.name == "chosen").unwrap();
        assert!(chosen.label_shown);
        // The city it crowds out loses its label instead.
        let neighbour = layout.iter().find(|e| e.name == "c0_0").unwrap();
        assert!(!neighbour.label_shown);
    }

    #[test]
    fn entries_are_sorted_nearest_first_with_stable_ties() {
        let cities = vec![
            city("b", 0.0, 20.0),
            city("a", 0.0, -20.0),
            city("near", 5.0, 0.0),
        ];
        let layout = compute_layout(
            &cities,
            &snapshot(0.0, 0.0, 1.0),
            &Viewport::default(),
            None,
            &LayoutParams::default(),
        );
        let names: Vec<&str> = layout.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["near", "b", "a"]);
        assert_eq!(layout[1].index, 0);
    }
}
