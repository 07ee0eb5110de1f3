use geo::{Intersects, Point, Rect};
use tracing::debug;

use crate::models::{MatchedPoint, PointRecord, Zone};

/// Run-scoped spatial index over the zone collection. Bounding boxes are
/// memoized here, never in global state, so concurrent runs stay
/// independent.
///
/// Matching iterates zones in collection order and the first containing
/// zone wins. That fixed order is the tie-break for points on shared edges
/// and for overlapping zones: the earliest zone in the file takes the
/// point, every run. Containment is boundary-inclusive (a point exactly on
/// an edge or vertex belongs to the zone).
pub struct ZoneIndex<'a> {
    zones: &'a [Zone],
    bounding_boxes: Vec<Option<Rect<f64>>>,
}

impl<'a> ZoneIndex<'a> {
    pub fn new(zones: &'a [Zone]) -> Self {
        let bounding_boxes = zones.iter().map(Zone::bounding_box).collect();
        debug!(zones = zones.len(), "built zone index");
        Self {
            zones,
            bounding_boxes,
        }
    }

    /// Zone containing the point, or `None` if it falls outside every zone.
    pub fn match_point(&self, record: &PointRecord) -> Option<&'a Zone> {
        let point = Point::new(record.longitude, record.latitude);

        for (zone, bbox) in self.zones.iter().zip(&self.bounding_boxes) {
            // Cheap bbox rejection before the full containment test.
            let candidate = match bbox {
                Some(bbox) => bbox.intersects(&point),
                None => false,
            };
            if candidate && zone.polygon.intersects(&point) {
                return Some(zone);
            }
        }

        None
    }

    /// Annotate every point with its zone, preserving input order.
    pub fn match_points(&self, records: Vec<PointRecord>) -> Vec<MatchedPoint> {
        records
            .into_iter()
            .map(|record| {
                let zone_id = self.match_point(&record).map(|z| z.id.clone());
                MatchedPoint {
                    point: record,
                    zone_id,
                }
            })
            .collect()
    }
}
