pub mod history;
pub mod resume;
pub mod training;

pub use history::AnalysisHistoryRecord;
pub use resume::Resume;
pub use training::{ModelMetrics, TrainingMetadata};
