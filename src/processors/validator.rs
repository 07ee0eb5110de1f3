use tracing::debug;
use validator::Validate;

use crate::models::{PointRecord, RejectReason, ValidationOutcome};
use crate::readers::point_reader::{FIELD_LATITUDE, FIELD_LONGITUDE, FIELD_VALUE};
use crate::readers::RawRow;

/// Validates normalized rows one by one, preserving input order. A bad row
/// becomes a rejection with a reason; it never aborts the run. Duplicate
/// coordinates are allowed, multiple sensors may share a location.
pub struct RowValidator;

impl RowValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_rows(&self, rows: &[RawRow]) -> Vec<ValidationOutcome> {
        let outcomes: Vec<ValidationOutcome> =
            rows.iter().map(|row| self.validate_row(row)).collect();

        let rejected = outcomes
            .iter()
            .filter(|o| matches!(o, ValidationOutcome::Rejected { .. }))
            .count();
        debug!(total = rows.len(), rejected, "validated point rows");

        outcomes
    }

    pub fn validate_row(&self, row: &RawRow) -> ValidationOutcome {
        let latitude = match parse_finite(&row.latitude) {
            Some(v) => v,
            None => {
                return ValidationOutcome::Rejected {
                    row_index: row.row_index,
                    reason: RejectReason::NotNumeric {
                        field: FIELD_LATITUDE,
                    },
                }
            }
        };

        let longitude = match parse_finite(&row.longitude) {
            Some(v) => v,
            None => {
                return ValidationOutcome::Rejected {
                    row_index: row.row_index,
                    reason: RejectReason::NotNumeric {
                        field: FIELD_LONGITUDE,
                    },
                }
            }
        };

        // Range constraints live on the record itself (validator derive).
        // Coordinates are checked before the value cell is parsed, so a row
        // that is bad in both ways reports the coordinate problem.
        let candidate = PointRecord::new(row.row_index, latitude, longitude, 0.0, None);
        if let Err(errors) = candidate.validate() {
            let field = if errors.field_errors().contains_key(FIELD_LATITUDE) {
                FIELD_LATITUDE
            } else {
                FIELD_LONGITUDE
            };
            return ValidationOutcome::Rejected {
                row_index: row.row_index,
                reason: RejectReason::OutOfRange { field },
            };
        }

        let value = match parse_finite(&row.value) {
            Some(v) => v,
            None => {
                return ValidationOutcome::Rejected {
                    row_index: row.row_index,
                    reason: RejectReason::NotNumeric { field: FIELD_VALUE },
                }
            }
        };

        ValidationOutcome::Accepted(PointRecord::new(
            row.row_index,
            latitude,
            longitude,
            value,
            row.label.clone(),
        ))
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_finite(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row_index: usize, lat: &str, lon: &str, value: &str) -> RawRow {
        RawRow {
            row_index,
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            value: value.to_string(),
            label: None,
        }
    }

    #[test]
    fn test_accepts_valid_row() {
        let outcome = RowValidator::new().validate_row(&raw(0, "-23.5505", "-46.6333", "32.5"));

        match outcome {
            ValidationOutcome::Accepted(record) => {
                assert_eq!(record.row_index, 0);
                assert!((record.value - 32.5).abs() < f64::EPSILON);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let outcome = RowValidator::new().validate_row(&raw(3, "10.0", "20.0", "warm"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 3,
                reason: RejectReason::NotNumeric { field: "value" },
            }
        );
    }

    #[test]
    fn test_rejects_empty_cell() {
        let outcome = RowValidator::new().validate_row(&raw(1, "10.0", "", "5.0"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 1,
                reason: RejectReason::NotNumeric { field: "longitude" },
            }
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let outcome = RowValidator::new().validate_row(&raw(0, "NaN", "0.0", "5.0"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 0,
                reason: RejectReason::NotNumeric { field: "latitude" },
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let outcome = RowValidator::new().validate_row(&raw(2, "200", "50", "10"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 2,
                reason: RejectReason::OutOfRange { field: "latitude" },
            }
        );
    }

    #[test]
    fn test_range_check_precedes_value_parsing() {
        // Bad coordinate and bad value on the same row: the coordinate
        // problem is the one reported.
        let outcome = RowValidator::new().validate_row(&raw(4, "200", "50", "warm"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 4,
                reason: RejectReason::OutOfRange { field: "latitude" },
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_longitude() {
        let outcome = RowValidator::new().validate_row(&raw(0, "45", "181", "10"));

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                row_index: 0,
                reason: RejectReason::OutOfRange { field: "longitude" },
            }
        );
    }

    #[test]
    fn test_duplicate_coordinates_allowed() {
        let validator = RowValidator::new();
        let rows = [raw(0, "1.0", "2.0", "5.0"), raw(1, "1.0", "2.0", "7.0")];
        let outcomes = validator.validate_rows(&rows);

        assert!(outcomes
            .iter()
            .all(|o| matches!(o, ValidationOutcome::Accepted(_))));
    }

    #[test]
    fn test_preserves_input_order() {
        let validator = RowValidator::new();
        let rows = [
            raw(0, "1.0", "2.0", "5.0"),
            raw(1, "bad", "2.0", "5.0"),
            raw(2, "3.0", "4.0", "6.0"),
        ];
        let outcomes = validator.validate_rows(&rows);

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], ValidationOutcome::Accepted(_)));
        assert!(matches!(
            outcomes[1],
            ValidationOutcome::Rejected { row_index: 1, .. }
        ));
        assert!(matches!(outcomes[2], ValidationOutcome::Accepted(_)));
    }
}
