use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::{LineString, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::Zone;

/// Raw GeoJSON shapes, deserialized with serde. Only the members the
/// analysis needs are kept.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// Reads a zone collection from GeoJSON. Zone order follows feature order
/// in the file; the matcher relies on that fixed order for deterministic
/// tie-breaking, so zones are never reordered or silently dropped. Any
/// malformed feature fails the whole read.
pub struct ZoneReader {
    id_property: String,
}

impl ZoneReader {
    pub fn new() -> Self {
        Self {
            id_property: "id".to_string(),
        }
    }

    pub fn with_id_property(id_property: &str) -> Self {
        Self {
            id_property: id_property.to_string(),
        }
    }

    pub fn read_zones_file(&self, path: &Path) -> Result<Vec<Zone>> {
        let file = File::open(path)?;
        self.read_zones(BufReader::new(file))
    }

    pub fn read_zones<R: Read>(&self, input: R) -> Result<Vec<Zone>> {
        let collection: FeatureCollection = serde_json::from_reader(input)?;

        if collection.kind != "FeatureCollection" {
            return Err(AnalysisError::Geometry(format!(
                "expected a FeatureCollection, got '{}'",
                collection.kind
            )));
        }

        let mut zones = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            zones.push(self.parse_feature(index, feature)?);
        }

        debug!(zones = zones.len(), "read zone collection");
        Ok(zones)
    }

    fn parse_feature(&self, index: usize, feature: Feature) -> Result<Zone> {
        let attributes = feature.properties.unwrap_or_default();

        let id = attributes
            .get(&self.id_property)
            .cloned()
            .or(feature.id)
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .ok_or_else(|| {
                AnalysisError::Geometry(format!(
                    "feature {} has no '{}' property and no feature id",
                    index, self.id_property
                ))
            })?;

        let geometry = feature.geometry.ok_or_else(|| {
            AnalysisError::Geometry(format!("zone '{}' has no geometry", id))
        })?;

        let polygon = parse_outer_ring(&id, &geometry)?;
        Ok(Zone::new(id, polygon, attributes))
    }
}

impl Default for ZoneReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a polygon from the outer ring only. Interior rings (holes) and
/// secondary polygons of a MultiPolygon are ignored, a documented
/// limitation of the matching model.
fn parse_outer_ring(id: &str, geometry: &Geometry) -> Result<Polygon<f64>> {
    let outer = match geometry.kind.as_str() {
        "Polygon" => geometry.coordinates.get(0),
        "MultiPolygon" => geometry.coordinates.get(0).and_then(|p| p.get(0)),
        other => {
            return Err(AnalysisError::Geometry(format!(
                "zone '{}' has unsupported geometry type '{}'",
                id, other
            )))
        }
    };

    let ring = outer
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::Geometry(format!("zone '{}' has no outer ring", id)))?;

    // A closed GeoJSON ring repeats its first position, so 4 is the minimum.
    if ring.len() < 4 {
        return Err(AnalysisError::Geometry(format!(
            "zone '{}' outer ring has {} positions, need at least 4",
            id,
            ring.len()
        )));
    }

    let mut coords = Vec::with_capacity(ring.len());
    for position in ring {
        let lon = position.get(0).and_then(Value::as_f64);
        let lat = position.get(1).and_then(Value::as_f64);
        match (lon, lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
                coords.push((lon, lat));
            }
            _ => {
                return Err(AnalysisError::Geometry(format!(
                    "zone '{}' has a non-numeric coordinate position",
                    id
                )))
            }
        }
    }

    Ok(Polygon::new(LineString::from(coords), vec![]))
}
