use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// A single validated measurement. Identity is the 0-based data-row index
/// in the source file (header row excluded). Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PointRecord {
    pub row_index: usize,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub value: f64,

    pub label: Option<String>,
}

impl PointRecord {
    pub fn new(
        row_index: usize,
        latitude: f64,
        longitude: f64,
        value: f64,
        label: Option<String>,
    ) -> Self {
        Self {
            row_index,
            latitude,
            longitude,
            value,
            label,
        }
    }
}

/// Why a raw row was rejected. The set is closed so callers can report
/// counts per reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    NotNumeric { field: &'static str },
    OutOfRange { field: &'static str },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotNumeric { field } => {
                write!(f, "'{}' is not a finite number", field)
            }
            RejectReason::OutOfRange { field } => {
                write!(f, "'{}' is outside the valid geographic range", field)
            }
        }
    }
}

/// Outcome of validating one raw row. Rejected rows never reach the
/// matcher or aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted(PointRecord),
    Rejected {
        row_index: usize,
        reason: RejectReason,
    },
}

/// A valid point annotated with the zone that contains it, or `None` if no
/// zone does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPoint {
    pub point: PointRecord,
    pub zone_id: Option<String>,
}
