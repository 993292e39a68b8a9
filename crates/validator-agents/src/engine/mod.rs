//! Validation pipeline

pub mod orchestrator;
pub mod result;

pub use orchestrator::{ProgressReporter, Stage, StartupValidator};
pub use result::{
    DataQualityLabels, ReportStatus, StageOutcome, StageState, Summary, ValidationReport,
};
