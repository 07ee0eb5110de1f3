use std::fs;

use tracing::Level;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::ValidationOutcome;
use crate::processors::{Aggregator, AnalysisPipeline, RowValidator};
use crate::readers::{PointReader, ZoneReader};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ReportGenerator, TableWriter};

pub fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Analyze {
            points,
            zones,
            report_file,
            export_file,
            id_property,
        } => {
            println!("Analyzing point measurements...");
            println!("Points file: {}", points.display());
            println!("Zones file: {}", zones.display());

            let progress = ProgressReporter::new_spinner("Running analysis...");

            let csv_bytes = fs::read(&points)?;
            let zone_collection =
                ZoneReader::with_id_property(&id_property).read_zones_file(&zones)?;

            let result = AnalysisPipeline::new().run(&csv_bytes, &zone_collection)?;

            progress.finish_with_message(&format!(
                "Analyzed {} points across {} zones",
                result.valid_count,
                zone_collection.len()
            ));

            let report = ReportGenerator::new().render(&result);
            println!("\n{}", report);

            if let Some(path) = report_file {
                fs::write(&path, &report)?;
                println!("Report written to {}", path.display());
            }

            if let Some(path) = export_file {
                TableWriter::new().write_file(&result, &path)?;
                println!(
                    "Exported {} points to {}",
                    result.points.len(),
                    path.display()
                );
            }
        }

        Commands::Validate { points } => {
            println!("Validating point measurements...");
            println!("Points file: {}", points.display());

            let csv_bytes = fs::read(&points)?;
            let (_, rows) = PointReader::new().read_rows(csv_bytes.as_slice())?;
            let outcomes = RowValidator::new().validate_rows(&rows);

            let mut accepted = 0;
            let mut rejected = Vec::new();
            for outcome in outcomes {
                match outcome {
                    ValidationOutcome::Accepted(_) => accepted += 1,
                    ValidationOutcome::Rejected { row_index, reason } => {
                        rejected.push((row_index, reason))
                    }
                }
            }

            println!("\n{} of {} rows are valid", accepted, rows.len());
            if rejected.is_empty() {
                println!("All rows passed validation");
            } else {
                println!("Rejected rows:");
                for (row_index, reason) in rejected {
                    println!("  row {}: {}", row_index, reason);
                }
            }
        }

        Commands::Info {
            zones,
            id_property,
            class_property,
        } => {
            println!("Zone collection: {}", zones.display());

            let zone_collection =
                ZoneReader::with_id_property(&id_property).read_zones_file(&zones)?;
            println!("Zones: {}", zone_collection.len());

            let bounds = zone_collection
                .iter()
                .filter_map(|z| z.bounding_box())
                .reduce(|acc, bbox| {
                    geo::Rect::new(
                        geo::Coord {
                            x: acc.min().x.min(bbox.min().x),
                            y: acc.min().y.min(bbox.min().y),
                        },
                        geo::Coord {
                            x: acc.max().x.max(bbox.max().x),
                            y: acc.max().y.max(bbox.max().y),
                        },
                    )
                });

            if let Some(bounds) = bounds {
                println!(
                    "Bounds: lon [{:.4}, {:.4}], lat [{:.4}, {:.4}]",
                    bounds.min().x,
                    bounds.max().x,
                    bounds.min().y,
                    bounds.max().y
                );
            }

            if let Some(class_property) = class_property {
                let composition =
                    Aggregator::new().zone_composition(&zone_collection, &class_property);

                println!("\nComposition by '{}':", class_property);
                println!(
                    "  {:<16} {:>6} {:>14} {:>8}",
                    "class", "zones", "area (km2)", "share"
                );
                for entry in composition {
                    println!(
                        "  {:<16} {:>6} {:>14.3} {:>7.1}%",
                        entry.class,
                        entry.zone_count,
                        entry.area_m2 / 1_000_000.0,
                        entry.percent
                    );
                }
            }
        }
    }

    Ok(())
}
