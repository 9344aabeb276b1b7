// ==========================================
// 纺纱工艺顾问 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口调用
// ==========================================

pub mod advisory_api;
pub mod error;
pub mod export;

// 重导出核心类型
pub use advisory_api::{AdvisoryApi, RunRequest};
pub use error::{ApiError, ApiResult};
pub use export::{export_file_name, write_report, EXPORT_FILE_PREFIX};
