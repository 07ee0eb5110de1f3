use serde::{Deserialize, Serialize};

use super::point::{MatchedPoint, RejectReason};

/// Descriptive statistics over the measurement values matched to one zone.
/// Only produced for zones with at least one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub zone_id: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); `None` when count < 2.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// The complete outcome of one analysis run. Constructed once by the
/// aggregator and never mutated; carries every count the report needs so
/// the presentation layer does no arithmetic of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Per-zone statistics, ordered by zone_id ascending.
    pub zone_stats: Vec<ZoneStatistics>,
    /// Eta-squared between zone membership and value; `None` when fewer
    /// than 2 zones hold points or fewer than 2 points matched.
    pub correlation: Option<f64>,
    pub total_rows: usize,
    pub valid_count: usize,
    /// Valid points dropped by the area-of-interest filter before matching.
    pub filtered_count: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    /// Rejected rows in input order.
    pub rejected_rows: Vec<(usize, RejectReason)>,
    /// Every valid point that entered matching, in input order.
    pub points: Vec<MatchedPoint>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Composition of the zone collection by a classification attribute:
/// how much geodesic area each class covers and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneComposition {
    pub class: String,
    pub zone_count: usize,
    pub area_m2: f64,
    pub percent: f64,
}
