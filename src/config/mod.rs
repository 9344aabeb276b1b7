// ==========================================
// 纺纱工艺顾问 - 配置层
// ==========================================
// 职责: 系统配置管理,支持覆写
// 存储: config_kv 表
// 说明: 凭证不进入配置层,由调用方逐次传入
// ==========================================

pub mod advisor_config_trait;
pub mod config_manager;
pub mod yield_policy;

// 重导出核心配置管理器
pub use advisor_config_trait::{AdvisorConfigReader, ConfigResult};
pub use config_manager::{config_keys, defaults, ConfigManager};
pub use yield_policy::YieldPolicy;
