pub mod boundary;
pub mod city;
pub mod fallback;

pub use boundary::{load_boundaries, parse_boundaries, Boundary};
pub use city::{load_cities, parse_cities, City, Dimension, SubMetrics, DEFAULT_SCORE};
pub use fallback::fallback_cities;

use crate::prelude::GlobeResult;
use crate::telemetry::{LogManager, MetricsRecorder};

/// Resolves a city feed result, substituting the built-in dataset when the
/// feed failed or came back empty.
pub fn cities_or_fallback(loaded: GlobeResult<Vec<City>>, metrics: &MetricsRecorder) -> Vec<City> {
    let logger = LogManager::new("feed");
    match loaded {
        Ok(cities) if !cities.is_empty() => {
            logger.record(&format!("loaded {} cities", cities.len()));
            cities
        }
        Ok(_) => {
            logger.warn("city feed is empty, using fallback dataset");
            metrics.record_fallback();
            fallback_cities()
        }
        Err(err) => {
            logger.warn(&format!("city feed failed ({}), using fallback dataset", err));
            metrics.record_fallback();
            fallback_cities()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::GlobeError;

    #[test]
    fn failed_feed_falls_back() {
        let metrics = MetricsRecorder::new();
        let cities = cities_or_fallback(Err(GlobeError::FeedParse("boom".into())), &metrics);
        assert_eq!(cities.len(), 3);
        assert_eq!(metrics.snapshot().feed_fallbacks, 1);
    }

    #[test]
    fn loaded_feed_is_kept() {
        let metrics = MetricsRecorder::new();
        let feed = "City,Latitude,Longitude\nQuito,-0.18,-78.47\n";
        let cities = cities_or_fallback(parse_cities(feed.as_bytes()), &metrics);
        assert_eq!(cities.len(), 1);
        assert_eq!(metrics.snapshot().feed_fallbacks, 0);
    }

    #[test]
    fn missing_file_falls_back() {
        let metrics = MetricsRecorder::new();
        let cities = cities_or_fallback(load_cities("/nonexistent/cities.csv"), &metrics);
        assert_eq!(cities[0].name, "Moscow");
    }
}
