use crate::data::city::{City, SubMetrics};

/// Built-in dataset substituted when the city feed cannot be loaded.
pub fn fallback_cities() -> Vec<City> {
    vec![
        city("Moscow", 55.75, 37.62, [80.0, 70.0, 60.0, 75.0], 71.0),
        city("New York", 40.71, -74.01, [65.0, 85.0, 90.0, 80.0], 80.0),
        city("London", 51.51, -0.13, [75.0, 80.0, 70.0, 85.0], 78.0),
    ]
}

fn city(name: &str, latitude: f64, longitude: f64, scores: [f64; 4], overall: f64) -> City {
    let [planet, people, profit, progress] = scores;
    City {
        name: name.to_string(),
        longitude,
        latitude,
        metrics: SubMetrics {
            planet,
            people,
            profit,
            progress,
        },
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_three_distinct_cities() {
        let cities = fallback_cities();
        assert_eq!(cities.len(), 3);
        assert_eq!(cities[2].name, "London");
        assert_eq!(cities[2].longitude, -0.13);
        assert_eq!(cities[0].latitude, 55.75);
    }
}
