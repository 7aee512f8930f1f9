use globecore::{Boundary, City, GlobeConfig};
use log::warn;
use serde::de::DeserializeOwned;
use std::env;

pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:9000";

pub fn feed_url() -> String {
    base_url(env::var("GLOBE_FEED_URL").ok())
}

fn base_url(configured: Option<String>) -> String {
    configured
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_URL.to_string())
}

/// Result of the one-shot startup fetch. Only the city feed keeps its error;
/// boundaries and configuration quietly fall back to empty and default.
#[derive(Debug, Clone)]
pub struct FeedBundle {
    pub cities: Result<Vec<City>, String>,
    pub boundaries: Vec<Boundary>,
    pub config: GlobeConfig,
}

async fn fetch_json<T: DeserializeOwned>(url: String) -> Result<T, String> {
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    let response = response.error_for_status().map_err(|e| e.to_string())?;
    response.json::<T>().await.map_err(|e| e.to_string())
}

pub async fn fetch_feed(base: String) -> FeedBundle {
    let (cities, boundaries, config) = tokio::join!(
        fetch_json::<Vec<City>>(format!("{base}/cities")),
        fetch_json::<Vec<Boundary>>(format!("{base}/boundaries")),
        fetch_json::<GlobeConfig>(format!("{base}/config")),
    );

    let boundaries = boundaries.unwrap_or_else(|err| {
        warn!("boundary feed unavailable: {}", err);
        Vec::new()
    });
    let config = match config {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("served globe config rejected: {}", err);
                GlobeConfig::default()
            }
        },
        Err(err) => {
            warn!("globe config unavailable: {}", err);
            GlobeConfig::default()
        }
    };

    FeedBundle {
        cities: cities.map_err(|err| format!("{base}/cities: {err}")),
        boundaries,
        config,
    }
}
