use std::collections::BTreeMap;

use geo::GeodesicArea;
use tracing::debug;

use crate::models::{
    AnalysisResult, MatchedPoint, RejectReason, Zone, ZoneComposition, ZoneStatistics,
};

/// Groups matched points by zone and derives the per-zone statistics and
/// the zone/value association measure. Pure over its inputs; a fresh
/// `AnalysisResult` is built on every call.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        points: Vec<MatchedPoint>,
        rejected_rows: Vec<(usize, RejectReason)>,
        total_rows: usize,
        filtered_count: usize,
    ) -> AnalysisResult {
        // BTreeMap keeps the zone_id ascending order the result promises.
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        let mut unmatched_count = 0;

        for matched in &points {
            match matched.zone_id.as_deref() {
                Some(zone_id) => groups.entry(zone_id).or_default().push(matched.point.value),
                None => unmatched_count += 1,
            }
        }

        let zone_stats: Vec<ZoneStatistics> = groups
            .iter()
            .map(|(zone_id, values)| zone_statistics(zone_id, values))
            .collect();

        let correlation = correlation_ratio(&groups);
        let matched_count = points.len() - unmatched_count;

        debug!(
            zones = zone_stats.len(),
            matched_count, unmatched_count, "aggregated analysis result"
        );

        AnalysisResult {
            zone_stats,
            correlation,
            total_rows,
            valid_count: points.len() + filtered_count,
            filtered_count,
            matched_count,
            unmatched_count,
            rejected_rows,
            points,
        }
    }

    /// Composition of the zone collection by a classification attribute,
    /// with geodesic areas. Zones missing the attribute are grouped under
    /// their zone id so nothing is silently dropped.
    pub fn zone_composition(&self, zones: &[Zone], class_property: &str) -> Vec<ZoneComposition> {
        let mut classes: BTreeMap<String, (usize, f64)> = BTreeMap::new();

        for zone in zones {
            let class = zone
                .attribute_str(class_property)
                .unwrap_or_else(|| zone.id.clone());
            let area = zone.polygon.geodesic_area_unsigned();
            let entry = classes.entry(class).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += area;
        }

        let total_area: f64 = classes.values().map(|(_, area)| area).sum();

        classes
            .into_iter()
            .map(|(class, (zone_count, area_m2))| ZoneComposition {
                class,
                zone_count,
                area_m2,
                percent: if total_area > 0.0 {
                    area_m2 / total_area * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn zone_statistics(zone_id: &str, values: &[f64]) -> ZoneStatistics {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Sample standard deviation (n − 1); undefined for a single point.
    let std_dev = if count < 2 {
        None
    } else {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (count - 1) as f64).sqrt())
    };

    ZoneStatistics {
        zone_id: zone_id.to_string(),
        count,
        mean,
        std_dev,
        min,
        max,
        median: median(values),
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Eta-squared: between-zone sum of squares over total sum of squares.
/// Bounded in [0, 1] and independent of zone ordering. `None` when fewer
/// than 2 zones hold points or fewer than 2 points matched; 0.0 when the
/// values carry no variance at all.
fn correlation_ratio(groups: &BTreeMap<&str, Vec<f64>>) -> Option<f64> {
    let total_count: usize = groups.values().map(Vec::len).sum();
    if groups.len() < 2 || total_count < 2 {
        return None;
    }

    let grand_mean: f64 = groups
        .values()
        .flat_map(|values| values.iter())
        .sum::<f64>()
        / total_count as f64;

    let ss_total: f64 = groups
        .values()
        .flat_map(|values| values.iter())
        .map(|v| (v - grand_mean).powi(2))
        .sum();

    if ss_total == 0.0 {
        return Some(0.0);
    }

    let ss_between: f64 = groups
        .values()
        .map(|values| {
            let group_mean = values.iter().sum::<f64>() / values.len() as f64;
            values.len() as f64 * (group_mean - grand_mean).powi(2)
        })
        .sum();

    Some(ss_between / ss_total)
}
