pub mod aggregator;
pub mod matcher;
pub mod pipeline;
pub mod validator;

pub use aggregator::Aggregator;
pub use matcher::ZoneIndex;
pub use pipeline::AnalysisPipeline;
pub use validator::RowValidator;
