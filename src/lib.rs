// ==========================================
// 纺纱工艺顾问 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + Gemini generateContent
// 系统定位: 决策支持工具（生成内容仅供参考,人工最终判断）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 系统配置
pub mod config;

// 引擎层 - 计算、提示词、分段、组装、编排
pub mod engine;

// 生成服务层 - 外部文本生成能力
pub mod generation;

// 数据仓储层 - 数据访问
pub mod repository;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GenerationMode, RunStage, SectionSlot};

// 领域实体
pub use domain::{ComputedMetrics, PlantConfiguration, PromptRequest, Report, ReportSections};

// 引擎
pub use engine::{
    AdvisoryOrchestrator, PromptBuilder, ReportAssembler, ResponseSegmenter, RunError,
    RunSettings, YieldCalculator,
};

// 生成服务
pub use generation::{Credentials, GeminiClient, GenerationClient, GenerationError};

// API
pub use api::{AdvisoryApi, ApiError, RunRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "纺纱工艺顾问";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
