pub mod analysis;
pub mod point;
pub mod zone;

pub use analysis::{AnalysisResult, ZoneComposition, ZoneStatistics};
pub use point::{MatchedPoint, PointRecord, RejectReason, ValidationOutcome};
pub use zone::Zone;
