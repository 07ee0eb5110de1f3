pub mod headers;
pub mod progress;

pub use headers::normalize_header;
