use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lcz-analyzer")]
#[command(about = "Overlay point measurements onto Local Climate Zone polygons")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis: validate, match, aggregate and report
    Analyze {
        #[arg(short, long, help = "Input CSV file with point measurements")]
        points: PathBuf,

        #[arg(short, long, help = "GeoJSON file with zone polygons")]
        zones: PathBuf,

        #[arg(long, help = "Write the text report to this file")]
        report_file: Option<PathBuf>,

        #[arg(long, help = "Write the point/zone export table to this file")]
        export_file: Option<PathBuf>,

        #[arg(long, default_value = "id", help = "Feature property holding the zone id")]
        id_property: String,
    },

    /// Validate a point CSV without running the analysis
    Validate {
        #[arg(short, long, help = "Input CSV file with point measurements")]
        points: PathBuf,
    },

    /// Display information about a zone collection
    Info {
        #[arg(short, long, help = "GeoJSON file with zone polygons")]
        zones: PathBuf,

        #[arg(long, default_value = "id", help = "Feature property holding the zone id")]
        id_property: String,

        #[arg(
            long,
            help = "Feature property holding the LCZ class; prints the composition table"
        )]
        class_property: Option<String>,
    },
}
