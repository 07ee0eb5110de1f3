use std::collections::HashMap;
use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::utils::normalize_header;

pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_LABEL: &str = "label";

/// Maps heterogeneous column names to the canonical point-record fields.
/// Lookup keys are pre-normalized (lowercase, accent-folded); arbitrary
/// synonyms can be added on top of the defaults.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    synonyms: HashMap<String, &'static str>,
}

impl SynonymTable {
    pub fn empty() -> Self {
        Self {
            synonyms: HashMap::new(),
        }
    }

    pub fn with_synonym(mut self, name: &str, canonical: &'static str) -> Self {
        self.synonyms.insert(normalize_header(name), canonical);
        self
    }

    /// Canonical field for a raw header, if any synonym matches.
    pub fn resolve(&self, header: &str) -> Option<&'static str> {
        self.synonyms.get(&normalize_header(header)).copied()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::empty()
            .with_synonym("lat", FIELD_LATITUDE)
            .with_synonym("latitude", FIELD_LATITUDE)
            .with_synonym("lon", FIELD_LONGITUDE)
            .with_synonym("lng", FIELD_LONGITUDE)
            .with_synonym("longitude", FIELD_LONGITUDE)
            .with_synonym("valor", FIELD_VALUE)
            .with_synonym("temp", FIELD_VALUE)
            .with_synonym("temperatura", FIELD_VALUE)
            .with_synonym("medida", FIELD_VALUE)
            .with_synonym("value", FIELD_VALUE)
            .with_synonym("label", FIELD_LABEL)
            .with_synonym("nome", FIELD_LABEL)
            .with_synonym("name", FIELD_LABEL)
            .with_synonym("rotulo", FIELD_LABEL)
    }
}

/// Column positions after schema resolution. Latitude, longitude and value
/// are mandatory; label is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub latitude: usize,
    pub longitude: usize,
    pub value: usize,
    pub label: Option<usize>,
}

/// One data row with canonical fields still in textual form. Parsing to
/// numbers is the validator's job so that a bad cell becomes a per-row
/// rejection instead of a read failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_index: usize,
    pub latitude: String,
    pub longitude: String,
    pub value: String,
    pub label: Option<String>,
}

/// Reads a delimited point table: resolves the header row against the
/// synonym table, then extracts the canonical columns from every data row.
/// Pure transform over the input bytes, no state kept between calls.
pub struct PointReader {
    synonyms: SynonymTable,
}

impl PointReader {
    pub fn new() -> Self {
        Self {
            synonyms: SynonymTable::default(),
        }
    }

    pub fn with_synonyms(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Resolve arbitrary headers to canonical column positions. The first
    /// header matching a canonical field wins; later duplicates are
    /// ignored. Fails naming the first missing mandatory field.
    pub fn resolve_schema(&self, headers: &csv::StringRecord) -> Result<ColumnSchema> {
        let mut latitude = None;
        let mut longitude = None;
        let mut value = None;
        let mut label = None;

        for (index, header) in headers.iter().enumerate() {
            match self.synonyms.resolve(header) {
                Some(FIELD_LATITUDE) if latitude.is_none() => latitude = Some(index),
                Some(FIELD_LONGITUDE) if longitude.is_none() => longitude = Some(index),
                Some(FIELD_VALUE) if value.is_none() => value = Some(index),
                Some(FIELD_LABEL) if label.is_none() => label = Some(index),
                _ => {}
            }
        }

        let latitude = latitude.ok_or(AnalysisError::Schema {
            field: FIELD_LATITUDE,
        })?;
        let longitude = longitude.ok_or(AnalysisError::Schema {
            field: FIELD_LONGITUDE,
        })?;
        let value = value.ok_or(AnalysisError::Schema { field: FIELD_VALUE })?;

        debug!(
            latitude, longitude, value, ?label,
            "resolved point table schema"
        );

        Ok(ColumnSchema {
            latitude,
            longitude,
            value,
            label,
        })
    }

    /// Read all data rows from CSV bytes. Row indices are 0-based over the
    /// data rows (the header row does not count). Short rows yield empty
    /// cells, which the validator rejects as non-numeric.
    pub fn read_rows<R: Read>(&self, input: R) -> Result<(ColumnSchema, Vec<RawRow>)> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);

        let schema = self.resolve_schema(reader.headers()?)?;

        let mut rows = Vec::new();
        for (row_index, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |index: usize| record.get(index).unwrap_or("").to_string();

            let label = schema
                .label
                .and_then(|index| record.get(index))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            rows.push(RawRow {
                row_index,
                latitude: cell(schema.latitude),
                longitude: cell(schema.longitude),
                value: cell(schema.value),
                label,
            });
        }

        debug!(rows = rows.len(), "read point table");
        Ok((schema, rows))
    }
}

impl Default for PointReader {
    fn default() -> Self {
        Self::new()
    }
}
