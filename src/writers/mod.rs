pub mod report;
pub mod table_writer;

pub use report::ReportGenerator;
pub use table_writer::TableWriter;
