use crate::prelude::{GeoPoint, GlobeError, GlobeResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Score used when a sub-metric or the aggregate is absent or unparsable.
pub const DEFAULT_SCORE: f64 = 50.0;

/// Coordinate used when a latitude or longitude is absent or unparsable.
pub const DEFAULT_COORDINATE: f64 = 0.0;

/// The four named sub-metric dimensions, in ray order (up, left, right, down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Planet,
    People,
    Profit,
    Progress,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Planet,
        Dimension::People,
        Dimension::Profit,
        Dimension::Progress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Planet => "Planet",
            Dimension::People => "People",
            Dimension::Profit => "Profit",
            Dimension::Progress => "Progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubMetrics {
    pub planet: f64,
    pub people: f64,
    pub profit: f64,
    pub progress: f64,
}

impl SubMetrics {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Planet => self.planet,
            Dimension::People => self.people,
            Dimension::Profit => self.profit,
            Dimension::Progress => self.progress,
        }
    }
}

impl Default for SubMetrics {
    fn default() -> Self {
        Self {
            planet: DEFAULT_SCORE,
            people: DEFAULT_SCORE,
            profit: DEFAULT_SCORE,
            progress: DEFAULT_SCORE,
        }
    }
}

/// A city with its sustainability scores. The name is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub metrics: SubMetrics,
    pub overall: f64,
}

impl City {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// One row of the city feed as it appears on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CityRow {
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<String>,
    #[serde(rename = "Longitude")]
    longitude: Option<String>,
    #[serde(rename = "Planet")]
    planet: Option<String>,
    #[serde(rename = "People")]
    people: Option<String>,
    #[serde(rename = "Profit")]
    profit: Option<String>,
    #[serde(rename = "Progress")]
    progress: Option<String>,
    #[serde(rename = "Overall")]
    overall: Option<String>,
}

impl CityRow {
    fn into_city(self) -> Option<City> {
        let name = self.city.map(|name| name.trim().to_string())?;
        if name.is_empty() {
            return None;
        }
        Some(City {
            name,
            longitude: lenient_number(self.longitude.as_deref(), DEFAULT_COORDINATE),
            latitude: lenient_number(self.latitude.as_deref(), DEFAULT_COORDINATE),
            metrics: SubMetrics {
                planet: lenient_number(self.planet.as_deref(), DEFAULT_SCORE),
                people: lenient_number(self.people.as_deref(), DEFAULT_SCORE),
                profit: lenient_number(self.profit.as_deref(), DEFAULT_SCORE),
                progress: lenient_number(self.progress.as_deref(), DEFAULT_SCORE),
            },
            overall: lenient_number(self.overall.as_deref(), DEFAULT_SCORE),
        })
    }
}

fn lenient_number(cell: Option<&str>, default: f64) -> f64 {
    cell.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

/// Parses the tabular city feed. Unreadable rows are skipped, not fatal.
pub fn parse_cities<R: Read>(reader: R) -> GlobeResult<Vec<City>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if !headers.iter().any(|h| h == "City") {
        return Err(GlobeError::FeedParse("missing City column".into()));
    }

    let mut cities = Vec::new();
    let mut seen = HashSet::new();
    for (line, row) in csv_reader.deserialize::<CityRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("skipping city row {}: {}", line + 1, err);
                continue;
            }
        };
        let Some(city) = row.into_city() else {
            warn!("skipping city row {}: no city name", line + 1);
            continue;
        };
        if !seen.insert(city.name.clone()) {
            warn!("skipping duplicate city {}", city.name);
            continue;
        }
        cities.push(city);
    }

    debug!("parsed {} cities", cities.len());
    Ok(cities)
}

pub fn load_cities<P: AsRef<Path>>(path: P) -> GlobeResult<Vec<City>> {
    let file = File::open(path.as_ref())?;
    parse_cities(file)
}
