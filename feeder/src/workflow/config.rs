use crate::generator::profile::SyntheticConfig;
use anyhow::Context;
use globecore::GlobeConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Where the feeds come from, where they are served and how the globe is tuned.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub cities: Option<PathBuf>,
    pub boundaries: Option<PathBuf>,
    /// Replaces the city feed with generated cities when present.
    pub synthetic: Option<SyntheticConfig>,
    pub bind: SocketAddr,
    pub globe: GlobeConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cities: None,
            boundaries: None,
            synthetic: None,
            bind: default_bind_address(),
            globe: GlobeConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading feed config {}", path_ref.display()))?;
        let config: FeedConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing feed config {}", path_ref.display()))?;
        config
            .globe
            .validate()
            .with_context(|| format!("validating feed config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        cities: Option<PathBuf>,
        boundaries: Option<PathBuf>,
        synthetic: Option<SyntheticConfig>,
    ) -> Self {
        Self {
            cities,
            boundaries,
            synthetic,
            ..Default::default()
        }
    }
}
