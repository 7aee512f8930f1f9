//! City lookup by name and camera recentering on a chosen city.

use crate::camera::CameraState;
use crate::data::City;

/// Case-insensitive substring match on city names, in feed order.
///
/// Queries shorter than `min_len` characters match nothing. Whitespace is
/// part of the query.
pub fn search<'a>(cities: &'a [City], query: &str, limit: usize, min_len: usize) -> Vec<&'a City> {
    if query.chars().count() < min_len.max(1) {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    cities
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

/// Turns the globe so `city` faces the viewer and zooms in on it.
/// Applying it twice leaves the camera where the first call put it.
pub fn select(camera: &mut CameraState, city: &City, focus_scale: f64) {
    camera.set_rotation(-city.longitude, -city.latitude);
    camera.zoom_to(focus_scale.min(camera.bounds().max_scale));
}

pub fn find_by_name<'a>(cities: &'a [City], name: &str) -> Option<&'a City> {
    cities.iter().find(|city| city.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fallback_cities, SubMetrics};

    fn named(names: &[&str]) -> Vec<City> {
        names
            .iter()
            .map(|name| City {
                name: name.to_string(),
                longitude: 0.0,
                latitude: 0.0,
                metrics: SubMetrics::default(),
                overall: 50.0,
            })
            .collect()
    }

    #[test]
    fn short_queries_match_nothing() {
        let cities = fallback_cities();
        assert!(search(&cities, "", 8, 2).is_empty());
        assert!(search(&cities, "L", 8, 2).is_empty());
        assert!(search(&cities, " ", 8, 2).is_empty());
    }

    #[test]
    fn whitespace_is_matched_literally() {
        let cities = fallback_cities();
        assert!(search(&cities, "on ", 8, 2).is_empty());
        assert!(search(&cities, " lon", 8, 2).is_empty());
        let names: Vec<&str> = search(&cities, "w y", 8, 2)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["New York"]);
    }

    #[test]
    fn matching_ignores_case_and_keeps_order() {
        let cities = fallback_cities();
        let names: Vec<&str> = search(&cities, "ON", 8, 2)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["London"]);

        let cities = named(&["Bordeaux", "Cordoba", "Oxford", "Ordos"]);
        let names: Vec<&str> = search(&cities, "or", 8, 2)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bordeaux", "Cordoba", "Oxford", "Ordos"]);
    }

    #[test]
    fn results_are_capped() {
        let names: Vec<String> = (0..20).map(|i| format!("Springfield {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let cities = named(&refs);
        let hits = search(&cities, "spring", 8, 2);
        assert_eq!(hits.len(), 8);
        assert_eq!(hits[0].name, "Springfield 0");
        assert_eq!(hits[7].name, "Springfield 7");
    }

    #[test]
    fn select_recenters_and_is_idempotent() {
        let cities = fallback_cities();
        let london = find_by_name(&cities, "London").unwrap();
        let mut camera = CameraState::default();
        select(&mut camera, london, 2.0);
        let first = camera.snapshot();
        assert!((first.yaw - 0.13).abs() < 1e-9);
        assert!((first.pitch + 51.51).abs() < 1e-9);
        assert_eq!(first.scale, 2.0);

        select(&mut camera, london, 2.0);
        assert_eq!(camera.snapshot(), first);
    }

    #[test]
    fn focus_scale_respects_bounds() {
        let cities = fallback_cities();
        let mut camera = CameraState::default();
        select(&mut camera, &cities[0], 10.0);
        assert_eq!(camera.snapshot().scale, camera.bounds().max_scale);
    }
}
