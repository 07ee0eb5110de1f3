use geo::{Intersects, Point, Polygon};
use tracing::info;

use crate::error::Result;
use crate::models::{PointRecord, RejectReason, ValidationOutcome, Zone};
use crate::processors::{Aggregator, RowValidator, ZoneIndex};
use crate::readers::{PointReader, SynonymTable};

/// End-to-end analysis over one upload: schema normalization, row
/// validation, optional area-of-interest clipping, spatial matching and
/// aggregation. Each `run` call is a pure function of its inputs; nothing
/// is cached across invocations.
pub struct AnalysisPipeline {
    reader: PointReader,
    area_of_interest: Option<Polygon<f64>>,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self {
            reader: PointReader::new(),
            area_of_interest: None,
        }
    }

    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.reader = PointReader::with_synonyms(synonyms);
        self
    }

    /// Restrict the analysis to points inside the given polygon. Valid
    /// points outside it are dropped before matching but still counted.
    pub fn with_area_of_interest(mut self, polygon: Polygon<f64>) -> Self {
        self.area_of_interest = Some(polygon);
        self
    }

    pub fn run(&self, csv_bytes: &[u8], zones: &[Zone]) -> Result<crate::models::AnalysisResult> {
        let (_, rows) = self.reader.read_rows(csv_bytes)?;
        let total_rows = rows.len();

        let outcomes = RowValidator::new().validate_rows(&rows);

        let mut valid: Vec<PointRecord> = Vec::new();
        let mut rejected: Vec<(usize, RejectReason)> = Vec::new();
        for outcome in outcomes {
            match outcome {
                ValidationOutcome::Accepted(record) => valid.push(record),
                ValidationOutcome::Rejected { row_index, reason } => {
                    rejected.push((row_index, reason))
                }
            }
        }

        let before_filter = valid.len();
        if let Some(area) = &self.area_of_interest {
            valid.retain(|record| {
                let point = Point::new(record.longitude, record.latitude);
                area.intersects(&point)
            });
        }
        let filtered_count = before_filter - valid.len();

        info!(
            total_rows,
            valid = before_filter,
            rejected = rejected.len(),
            filtered = filtered_count,
            zones = zones.len(),
            "running spatial analysis"
        );

        let index = ZoneIndex::new(zones);
        let points = index.match_points(valid);

        Ok(Aggregator::new().aggregate(points, rejected, total_rows, filtered_count))
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}
