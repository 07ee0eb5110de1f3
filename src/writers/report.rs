use std::fmt::Write;

use crate::models::AnalysisResult;

/// Renders an `AnalysisResult` as a structured text report. Strictly a
/// presentation layer: every number comes from the result as-is and the
/// output is byte-identical for identical results (no timestamps, no
/// recomputation).
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, result: &AnalysisResult) -> String {
        let mut report = String::new();

        report.push_str("=== LCZ Analysis Report ===\n\n");

        report.push_str("Summary:\n");
        let _ = writeln!(report, "  Input rows:     {}", result.total_rows);
        let _ = writeln!(report, "  Valid points:   {}", result.valid_count);
        if result.filtered_count > 0 {
            let _ = writeln!(
                report,
                "  Outside area:   {} (excluded by area of interest)",
                result.filtered_count
            );
        }
        let _ = writeln!(report, "  Matched:        {}", result.matched_count);
        let _ = writeln!(report, "  Unmatched:      {}", result.unmatched_count);
        let _ = writeln!(report, "  Rejected rows:  {}", result.rejected_rows.len());
        report.push('\n');

        report.push_str("Per-Zone Statistics:\n");
        if result.zone_stats.is_empty() {
            if result.points.is_empty() {
                report.push_str("  No valid points were available for analysis.\n");
            } else {
                report.push_str("  No zone contained any point.\n");
            }
        } else {
            let _ = writeln!(
                report,
                "  {:<16} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
                "zone_id", "count", "mean", "std_dev", "min", "max", "median"
            );
            for stats in &result.zone_stats {
                let std_dev = match stats.std_dev {
                    Some(sd) => format!("{:.2}", sd),
                    None => "n/a".to_string(),
                };
                let _ = writeln!(
                    report,
                    "  {:<16} {:>6} {:>9.2} {:>9} {:>9.2} {:>9.2} {:>9.2}",
                    stats.zone_id, stats.count, stats.mean, std_dev, stats.min, stats.max,
                    stats.median
                );
            }
        }
        report.push('\n');

        report.push_str("Correlation:\n");
        match result.correlation {
            Some(eta) => {
                let _ = writeln!(
                    report,
                    "  Eta-squared between zone membership and value: {:.4}",
                    eta
                );
            }
            None => {
                report.push_str(
                    "  Not defined: needs at least 2 zones with points and 2 matched points.\n",
                );
            }
        }

        if !result.rejected_rows.is_empty() {
            report.push('\n');
            report.push_str("Rejected Rows:\n");
            for (row_index, reason) in &result.rejected_rows {
                let _ = writeln!(report, "  row {}: {}", row_index, reason);
            }
        }

        report
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
