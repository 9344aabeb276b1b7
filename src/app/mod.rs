// ==========================================
// 纺纱工艺顾问 - 应用层
// ==========================================
// 职责: 装配各层,供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
