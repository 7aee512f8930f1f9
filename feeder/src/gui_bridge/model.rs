use crate::generator::profile::synthetic_cities;
use crate::workflow::config::FeedConfig;
use globecore::data::{cities_or_fallback, fallback_cities, load_boundaries, load_cities};
use globecore::telemetry::MetricsRecorder;
use globecore::{Boundary, City, GlobeConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Csv,
    Synthetic,
    Fallback,
}

/// Everything the bridge serves: one consistent snapshot of both feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedModel {
    pub cities: Vec<City>,
    pub boundaries: Vec<Boundary>,
    pub config: GlobeConfig,
    pub source: FeedSource,
}

impl Default for FeedModel {
    fn default() -> Self {
        Self {
            cities: fallback_cities(),
            boundaries: Vec::new(),
            config: GlobeConfig::default(),
            source: FeedSource::Fallback,
        }
    }
}

impl FeedModel {
    /// Loads the feeds named by `config`. Neither feed failing is fatal: the
    /// city feed falls back to the built-in cities and boundaries to none.
    pub fn load(config: &FeedConfig, metrics: &MetricsRecorder) -> Self {
        let (cities, source) = match (&config.synthetic, &config.cities) {
            (Some(synthetic), _) => {
                info!(
                    "generating {} synthetic cities (seed {})",
                    synthetic.count, synthetic.seed
                );
                (synthetic_cities(synthetic), FeedSource::Synthetic)
            }
            (None, Some(path)) => {
                let before = metrics.snapshot().feed_fallbacks;
                let cities = cities_or_fallback(load_cities(path), metrics);
                let source = if metrics.snapshot().feed_fallbacks > before {
                    FeedSource::Fallback
                } else {
                    FeedSource::Csv
                };
                (cities, source)
            }
            (None, None) => {
                info!("no city feed configured, serving the built-in cities");
                (fallback_cities(), FeedSource::Fallback)
            }
        };

        let boundaries = match &config.boundaries {
            Some(path) => load_boundaries(path).unwrap_or_else(|err| {
                warn!("boundary feed {} unusable: {}", path.display(), err);
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self {
            cities,
            boundaries,
            config: config.globe.clone(),
            source,
        }
    }

    pub fn ring_count(&self) -> usize {
        self.boundaries.iter().map(|b| b.rings.len()).sum()
    }
}
