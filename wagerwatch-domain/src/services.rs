// Detection services
pub mod amount_band;
pub mod analyzer;
pub mod sequence_detector;
pub mod streak_detector;
pub mod timeline_builder;

pub use amount_band::*;
pub use analyzer::*;
pub use sequence_detector::*;
pub use streak_detector::*;
pub use timeline_builder::*;
