// ==========================================
// 纺纱工艺顾问 - 引擎层
// ==========================================
// 职责: 计算、提示词构建、分段、组装与运行编排
// 红线: Engine 不拼 SQL,不直接访问网络（经由 GenerationClient）
// ==========================================

pub mod calculator;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod prompt_builder;
pub mod report_assembler;
pub mod segmenter;

// 重导出核心引擎
pub use calculator::{capacity_balance, daily_tonnage, twist_per_inch, YieldCalculator};
pub use error::{RunError, RunResult, ValidationError};
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, RunEvent, RunEventPublisher, RunEventType,
};
pub use orchestrator::{AdvisoryOrchestrator, RunSettings};
pub use prompt_builder::PromptBuilder;
pub use report_assembler::{parse_sections, ReportAssembler};
pub use segmenter::{ResponseSegmenter, SegmentationOutcome, SECTION_DELIMITER};
