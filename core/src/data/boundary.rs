//! Country outlines for the map background.
//!
//! Accepts TopoJSON topologies (quantized, delta-encoded arcs) and GeoJSON
//! feature collections. Rings are passed through as given; nothing is
//! simplified or validated beyond what decoding requires.

use crate::prelude::{GeoPoint, GlobeError, GlobeResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// One named shape made of closed rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub name: Option<String>,
    pub rings: Vec<Vec<GeoPoint>>,
}

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Unsupported,
}

pub fn parse_boundaries(json: &str) -> GlobeResult<Vec<Boundary>> {
    let root: Value = serde_json::from_str(json)?;
    match root.get("type").and_then(Value::as_str) {
        Some("Topology") => {
            let topology: Topology = serde_json::from_value(root)?;
            decode_topology(&topology)
        }
        Some("FeatureCollection") => decode_feature_collection(&root),
        Some(other) => Err(GlobeError::BoundaryFormat(other.to_string())),
        None => Err(GlobeError::BoundaryFormat("missing type".into())),
    }
}

pub fn load_boundaries<P: AsRef<Path>>(path: P) -> GlobeResult<Vec<Boundary>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_boundaries(&contents)
}

fn decode_topology(topology: &Topology) -> GlobeResult<Vec<Boundary>> {
    let arcs = decode_arcs(&topology.arcs, topology.transform);
    let mut boundaries = Vec::new();
    for (name, object) in &topology.objects {
        debug!("decoding topology object {}", name);
        collect_topo_geometry(object, &arcs, &mut boundaries)?;
    }
    Ok(boundaries)
}

fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<GeoPoint>> {
    raw.iter()
        .map(|arc| match transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|position| position.len() >= 2)
                    .map(|position| {
                        x += position[0];
                        y += position[1];
                        GeoPoint::new(
                            x * t.scale[0] + t.translate[0],
                            y * t.scale[1] + t.translate[1],
                        )
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|position| position.len() >= 2)
                .map(|position| GeoPoint::new(position[0], position[1]))
                .collect(),
        })
        .collect()
}

fn collect_topo_geometry(
    value: &Value,
    arcs: &[Vec<GeoPoint>],
    out: &mut Vec<Boundary>,
) -> GlobeResult<()> {
    let geometry = match serde_json::from_value::<TopoGeometry>(value.clone()) {
        Ok(geometry) => geometry,
        Err(err) => {
            warn!("skipping topology geometry: {}", err);
            return Ok(());
        }
    };

    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in &geometries {
                collect_topo_geometry(child, arcs, out)?;
            }
        }
        TopoGeometry::Polygon {
            arcs: rings,
            properties,
        } => {
            let rings = rings
                .iter()
                .map(|ring| stitch_ring(ring, arcs))
                .collect::<GlobeResult<Vec<_>>>()?;
            out.push(Boundary {
                name: boundary_name(properties.as_ref()),
                rings,
            });
        }
        TopoGeometry::MultiPolygon {
            arcs: polygons,
            properties,
        } => {
            let mut rings = Vec::new();
            for polygon in &polygons {
                for ring in polygon {
                    rings.push(stitch_ring(ring, arcs)?);
                }
            }
            out.push(Boundary {
                name: boundary_name(properties.as_ref()),
                rings,
            });
        }
        TopoGeometry::Unsupported => {}
    }
    Ok(())
}

/// Joins arcs into one ring; a negative index `i` means arc `!i` reversed.
fn stitch_ring(indices: &[i64], arcs: &[Vec<GeoPoint>]) -> GlobeResult<Vec<GeoPoint>> {
    let mut ring: Vec<GeoPoint> = Vec::new();
    for &index in indices {
        let (arc_index, reversed) = if index >= 0 {
            (index as usize, false)
        } else {
            ((!index) as usize, true)
        };
        let arc = arcs.get(arc_index).ok_or_else(|| {
            GlobeError::BoundaryFormat(format!("arc index {} out of range", index))
        })?;

        let points: Vec<GeoPoint> = if reversed {
            arc.iter().rev().copied().collect()
        } else {
            arc.clone()
        };
        // Consecutive arcs share their joint point.
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

fn decode_feature_collection(root: &Value) -> GlobeResult<Vec<Boundary>> {
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| GlobeError::BoundaryFormat("feature collection without features".into()))?;

    let mut boundaries = Vec::new();
    for feature in features {
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        let properties = feature.get("properties").and_then(Value::as_object);
        let rings = match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => polygon_rings(geometry.get("coordinates")),
            Some("MultiPolygon") => geometry
                .get("coordinates")
                .and_then(Value::as_array)
                .map(|polygons| {
                    polygons
                        .iter()
                        .flat_map(|polygon| polygon_rings(Some(polygon)))
                        .collect()
                })
                .unwrap_or_default(),
            _ => continue,
        };
        boundaries.push(Boundary {
            name: boundary_name(properties),
            rings,
        });
    }
    Ok(boundaries)
}

fn polygon_rings(coordinates: Option<&Value>) -> Vec<Vec<GeoPoint>> {
    let Some(rings) = coordinates.and_then(Value::as_array) else {
        return Vec::new();
    };
    rings
        .iter()
        .filter_map(Value::as_array)
        .map(|ring| {
            ring.iter()
                .filter_map(Value::as_array)
                .filter_map(|position| {
                    let lon = position.first()?.as_f64()?;
                    let lat = position.get(1)?.as_f64()?;
                    Some(GeoPoint::new(lon, lat))
                })
                .collect()
        })
        .collect()
}

fn boundary_name(properties: Option<&Map<String, Value>>) -> Option<String> {
    let properties = properties?;
    ["NAME", "name", "ADMIN", "admin"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.25], "translate": [-10.0, 20.0] },
        "arcs": [
            [[0, 0], [4, 0], [0, 4]],
            [[4, 4], [-4, 0], [0, -4]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": { "NAME": "Square" } },
                    { "type": "MultiPolygon", "arcs": [[[-2, -1]]] },
                    { "type": null }
                ]
            }
        }
    }"#;

    #[test]
    fn topology_arcs_are_dequantized_and_stitched() {
        let boundaries = parse_boundaries(TOPOLOGY).unwrap();
        assert_eq!(boundaries.len(), 2);

        let square = &boundaries[0];
        assert_eq!(square.name.as_deref(), Some("Square"));
        let ring = &square.rings[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], GeoPoint::new(-10.0, 20.0));
        assert_eq!(ring[1], GeoPoint::new(-8.0, 20.0));
        assert_eq!(ring[2], GeoPoint::new(-8.0, 21.0));
        assert_eq!(ring[3], GeoPoint::new(-10.0, 21.0));
        assert_eq!(ring[4], ring[0]);

        let reversed = &boundaries[1].rings[0];
        assert_eq!(reversed.first(), Some(&GeoPoint::new(-10.0, 20.0)));
        assert_eq!(reversed[1], GeoPoint::new(-10.0, 21.0));
    }

    #[test]
    fn out_of_range_arc_is_an_error() {
        let json = r#"{"type":"Topology","arcs":[],"objects":{"a":{"type":"Polygon","arcs":[[3]]}}}"#;
        assert!(matches!(
            parse_boundaries(json),
            Err(GlobeError::BoundaryFormat(_))
        ));
    }

    #[test]
    fn geojson_polygons_and_multipolygons_decode() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "name": "A" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "MultiPolygon",
                                "coordinates": [[[[5,5],[6,5],[6,6],[5,5]]], [[[7,7],[8,7],[8,8],[7,7]]]] } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1, 2] } }
            ]
        }"#;
        let boundaries = parse_boundaries(json).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].name.as_deref(), Some("A"));
        assert_eq!(boundaries[0].rings[0].len(), 4);
        assert_eq!(boundaries[1].rings.len(), 2);
        assert_eq!(boundaries[1].name, None);
    }

    #[test]
    fn unknown_document_type_is_rejected() {
        assert!(matches!(
            parse_boundaries(r#"{"type":"Point","coordinates":[0,0]}"#),
            Err(GlobeError::BoundaryFormat(_))
        ));
    }
}
