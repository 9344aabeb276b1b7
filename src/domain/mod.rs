// ==========================================
// 纺纱工艺顾问 - 领域层
// ==========================================
// 职责: 实体与值对象,不含 IO
// ==========================================

pub mod metrics;
pub mod plant;
pub mod prompt;
pub mod report;
pub mod run_log;
pub mod types;

pub use metrics::ComputedMetrics;
pub use plant::PlantConfiguration;
pub use prompt::PromptRequest;
pub use report::{
    Report, ReportMetadata, ReportSections, PLACEHOLDER_ERROR, PLACEHOLDER_PROCESSING,
};
pub use run_log::{RunLog, RunOutcome};
pub use types::{GenerationMode, RunStage, SectionSlot};
