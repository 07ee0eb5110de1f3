use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use lcz_analyzer::models::RejectReason;
use lcz_analyzer::processors::AnalysisPipeline;
use lcz_analyzer::readers::ZoneReader;
use lcz_analyzer::writers::{ReportGenerator, TableWriter};

const ZONES_JSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": {"id": "lcz-2", "lcz": "2"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-46.65, -23.56], [-46.60, -23.56],
                    [-46.60, -23.54], [-46.65, -23.54],
                    [-46.65, -23.56]
                ]]
            }
        },
        {
            "type": "Feature",
            "properties": {"id": "lcz-9", "lcz": "9"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-46.60, -23.56], [-46.55, -23.56],
                    [-46.55, -23.54], [-46.60, -23.54],
                    [-46.60, -23.56]
                ]]
            }
        }
    ]
}"#;

fn read_zones() -> Vec<lcz_analyzer::models::Zone> {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(ZONES_JSON.as_bytes()).unwrap();
    ZoneReader::new().read_zones_file(file.path()).unwrap()
}

#[test]
fn test_worked_example_end_to_end() {
    let csv = "Lat,Lng,Temp,Name\n\
               -23.5505,-46.6333,32.5,Centro\n\
               -23.5489,-46.6388,28.2,Ibirapuera\n\
               200,50,10,Bad\n";
    let zones = read_zones();

    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(result.valid_count, 2);
    assert_eq!(result.unmatched_count, 0);
    assert_eq!(
        result.rejected_rows,
        vec![(2, RejectReason::OutOfRange { field: "latitude" })]
    );

    assert_eq!(result.zone_stats.len(), 1);
    assert_eq!(result.zone_stats[0].zone_id, "lcz-2");
    assert_eq!(result.zone_stats[0].count, 2);
    assert!((result.zone_stats[0].mean - 30.35).abs() < 1e-9);
}

#[test]
fn test_report_and_table_are_byte_identical_across_runs() {
    let csv = "lat,lon,valor\n\
               -23.5505,-46.6333,32.5\n\
               -23.5489,-46.6388,28.2\n\
               -23.55,-46.57,29.9\n\
               -23.55,-46.57,31.1\n\
               12.0,80.0,15.0\n";
    let zones = read_zones();

    let pipeline = AnalysisPipeline::new();
    let first = pipeline.run(csv.as_bytes(), &zones).unwrap();
    let second = pipeline.run(csv.as_bytes(), &zones).unwrap();

    let generator = ReportGenerator::new();
    assert_eq!(generator.render(&first), generator.render(&second));

    let writer = TableWriter::new();
    assert_eq!(
        writer.write_string(&first).unwrap(),
        writer.write_string(&second).unwrap()
    );
}

#[test]
fn test_matched_points_lie_within_zone_bounding_boxes() {
    let csv = "lat,lon,value\n\
               -23.5505,-46.6333,32.5\n\
               -23.545,-46.58,27.0\n\
               -23.559,-46.649,26.0\n\
               40.0,40.0,10.0\n";
    let zones = read_zones();

    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();

    for matched in &result.points {
        let Some(zone_id) = &matched.zone_id else {
            continue;
        };
        let zone = zones.iter().find(|z| &z.id == zone_id).unwrap();
        let bbox = zone.bounding_box().unwrap();

        assert!(matched.point.longitude >= bbox.min().x);
        assert!(matched.point.longitude <= bbox.max().x);
        assert!(matched.point.latitude >= bbox.min().y);
        assert!(matched.point.latitude <= bbox.max().y);
    }
}

#[test]
fn test_accounting_invariants() {
    let csv = "lat,lon,value\n\
               -23.5505,-46.6333,32.5\n\
               not-a-number,-46.63,20.0\n\
               -23.545,-46.58,27.0\n\
               5.0,5.0,22.0\n\
               95.0,0.0,18.0\n";
    let zones = read_zones();

    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();

    assert_eq!(
        result.valid_count + result.rejected_rows.len(),
        result.total_rows
    );
    let zone_total: usize = result.zone_stats.iter().map(|s| s.count).sum();
    assert_eq!(zone_total + result.unmatched_count, result.valid_count);
}

#[test]
fn test_correlation_requires_two_populated_zones() {
    // Both points fall in lcz-2 only.
    let csv = "lat,lon,value\n-23.5505,-46.6333,32.5\n-23.5489,-46.6388,28.2\n";
    let zones = read_zones();

    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();
    assert_eq!(result.correlation, None);

    // One point per zone: correlation becomes defined.
    let csv = "lat,lon,value\n-23.5505,-46.6333,32.5\n-23.545,-46.58,27.0\n";
    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();

    let eta = result.correlation.unwrap();
    assert!((0.0..=1.0).contains(&eta));
}

#[test]
fn test_boundary_point_resolves_identically_every_run() {
    // Exactly on the vertex shared by both zones at (-46.60, -23.56).
    let csv = "lat,lon,value\n-23.56,-46.60,25.0\n";
    let zones = read_zones();
    let pipeline = AnalysisPipeline::new();

    let first_assignment = pipeline
        .run(csv.as_bytes(), &zones)
        .unwrap()
        .points[0]
        .zone_id
        .clone();

    // The shared vertex belongs to the zone listed first in the collection.
    assert_eq!(first_assignment.as_deref(), Some("lcz-2"));

    for _ in 0..10 {
        let result = pipeline.run(csv.as_bytes(), &zones).unwrap();
        assert_eq!(result.points[0].zone_id, first_assignment);
    }
}

#[test]
fn test_schema_error_names_missing_field() {
    let csv = "lat,lon,notes\n1.0,2.0,hello\n";
    let zones = read_zones();

    let err = AnalysisPipeline::new()
        .run(csv.as_bytes(), &zones)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Schema error: no column resolves to 'value'"
    );
}

#[test]
fn test_export_table_shape() {
    let csv = "lat,lon,value,label\n\
               -23.5505,-46.6333,32.5,Centro\n\
               5.0,5.0,22.0,Nowhere\n";
    let zones = read_zones();

    let result = AnalysisPipeline::new().run(csv.as_bytes(), &zones).unwrap();
    let table = TableWriter::new().write_string(&result).unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], "row_index,latitude,longitude,value,label,zone_id");
    // One row per valid point, matched or not; rejected rows excluded.
    assert_eq!(lines.len(), 1 + result.valid_count);
    assert!(lines[1].ends_with(",lcz-2"));
    assert!(lines[2].ends_with(",Nowhere,"));
}
