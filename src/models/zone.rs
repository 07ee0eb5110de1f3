use geo::{BoundingRect, Polygon, Rect};
use serde_json::{Map, Value};

/// A climate-zone polygon from the external geospatial layer. Zones are
/// read-only inputs for a single analysis run; only the outer ring of the
/// geometry is kept.
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub polygon: Polygon<f64>,
    pub attributes: Map<String, Value>,
}

impl Zone {
    pub fn new(id: String, polygon: Polygon<f64>, attributes: Map<String, Value>) -> Self {
        Self {
            id,
            polygon,
            attributes,
        }
    }

    /// Axis-aligned bounding box of the outer ring. `None` only for a
    /// degenerate empty ring, which the zone reader rejects upstream.
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        self.polygon.bounding_rect()
    }

    /// Attribute value rendered as a plain string, for grouping and display.
    pub fn attribute_str(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
