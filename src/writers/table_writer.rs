use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::AnalysisResult;

/// Writes the flat export table: one row per valid point with its zone
/// assignment, rejected rows excluded. Output is deterministic for a given
/// result.
pub struct TableWriter;

impl TableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write<W: Write>(&self, result: &AnalysisResult, output: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(output);

        writer.write_record([
            "row_index",
            "latitude",
            "longitude",
            "value",
            "label",
            "zone_id",
        ])?;

        for matched in &result.points {
            let point = &matched.point;
            writer.write_record([
                point.row_index.to_string(),
                point.latitude.to_string(),
                point.longitude.to_string(),
                point.value.to_string(),
                point.label.clone().unwrap_or_default(),
                matched.zone_id.clone().unwrap_or_default(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_file(&self, result: &AnalysisResult, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.write(result, File::create(path)?)
    }

    /// Render the table into a string, for display or tests.
    pub fn write_string(&self, result: &AnalysisResult) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(result, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("csv output is valid UTF-8"))
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}
