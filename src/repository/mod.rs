// ==========================================
// 纺纱工艺顾问 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod report_repo;
pub mod run_log_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use report_repo::{ReportRepository, ReportSummary};
pub use run_log_repo::RunLogRepository;
