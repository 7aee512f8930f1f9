use globecore::data::{City, SubMetrics};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic city feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub count: usize,
    pub seed: u64,
    /// Latitude band cities are scattered over, in degrees.
    pub min_lat: f64,
    pub max_lat: f64,
    pub name_prefix: String,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            count: 250,
            seed: 7,
            min_lat: -55.0,
            max_lat: 70.0,
            name_prefix: "Synthetic".into(),
        }
    }
}

impl SyntheticConfig {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            ..Default::default()
        }
    }

    fn lat_band(&self) -> (f64, f64) {
        let low = self.min_lat.clamp(-90.0, 90.0);
        let high = self.max_lat.clamp(-90.0, 90.0);
        if low < high {
            (low, high)
        } else {
            (-90.0, 90.0)
        }
    }
}

fn score(rng: &mut StdRng) -> f64 {
    (rng.gen_range(0.0..=100.0_f64) * 10.0).round() / 10.0
}

/// Scatters `count` cities over the configured band. The same seed always
/// yields the same feed.
pub fn synthetic_cities(config: &SyntheticConfig) -> Vec<City> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (min_lat, max_lat) = config.lat_band();
    let width = config.count.max(1).to_string().len();

    (0..config.count)
        .map(|index| {
            let metrics = SubMetrics {
                planet: score(&mut rng),
                people: score(&mut rng),
                profit: score(&mut rng),
                progress: score(&mut rng),
            };
            let overall =
                (metrics.planet + metrics.people + metrics.profit + metrics.progress) / 4.0;
            City {
                name: format!("{} {:0width$}", config.name_prefix, index + 1, width = width),
                longitude: rng.gen_range(-180.0..180.0),
                latitude: rng.gen_range(min_lat..=max_lat),
                metrics,
                overall: (overall * 10.0).round() / 10.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generator_builds_requested_count_with_unique_names() {
        let cities = synthetic_cities(&SyntheticConfig::new(120, 3));
        assert_eq!(cities.len(), 120);
        let names: HashSet<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 120);
        assert_eq!(cities[0].name, "Synthetic 001");
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let a = synthetic_cities(&SyntheticConfig::new(10, 42));
        let b = synthetic_cities(&SyntheticConfig::new(10, 42));
        let c = synthetic_cities(&SyntheticConfig::new(10, 43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let config = SyntheticConfig {
            count: 300,
            seed: 9,
            min_lat: -20.0,
            max_lat: 20.0,
            name_prefix: "T".into(),
        };
        for city in synthetic_cities(&config) {
            assert!((-180.0..180.0).contains(&city.longitude));
            assert!((-20.0..=20.0).contains(&city.latitude));
            assert!((0.0..=100.0).contains(&city.overall));
            assert!((0.0..=100.0).contains(&city.metrics.progress));
        }
    }

    #[test]
    fn inverted_band_covers_the_whole_globe() {
        let config = SyntheticConfig {
            min_lat: 40.0,
            max_lat: 10.0,
            ..SyntheticConfig::new(1, 1)
        };
        assert_eq!(config.lat_band(), (-90.0, 90.0));
    }
}
