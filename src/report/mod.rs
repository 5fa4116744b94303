//! Analysis records and the report handed to the orchestration layer.

pub mod assembler;
pub mod record;

pub use assembler::{AnalystMessage, ReportAssembler, StrategyOutput, DEFAULT_AGENT_NAME};
pub use record::{AnalysisRecord, AnalysisReport, LabelDetail};
