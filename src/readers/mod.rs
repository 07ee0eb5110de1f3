pub mod point_reader;
pub mod zone_reader;

pub use point_reader::{ColumnSchema, PointReader, RawRow, SynonymTable};
pub use zone_reader::ZoneReader;
