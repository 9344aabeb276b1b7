// ==========================================
// 纺纱工艺顾问 - 顾问配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含凭证
// ==========================================

use crate::config::yield_policy::YieldPolicy;
use crate::domain::types::GenerationMode;
use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// AdvisorConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AdvisorConfigReader: Send + Sync {
    // ===== 生成服务 =====

    /// 默认模型标识
    ///
    /// # 默认值
    /// - gemini-1.5-flash
    async fn get_model_id(&self) -> ConfigResult<String>;

    /// 默认生成模式
    ///
    /// # 默认值
    /// - UNIFIED
    async fn get_generation_mode(&self) -> ConfigResult<GenerationMode>;

    /// 单次生成调用超时
    ///
    /// # 默认值
    /// - 60 秒
    async fn get_call_timeout(&self) -> ConfigResult<Duration>;

    /// 生成服务地址
    async fn get_generation_endpoint(&self) -> ConfigResult<String>;

    // ===== 产量公式 =====

    /// 产量公式系数
    async fn get_yield_policy(&self) -> ConfigResult<YieldPolicy>;

    // ===== 报告 =====

    /// 报告标题
    async fn get_report_title(&self) -> ConfigResult<String>;

    /// 导出目录（None 表示使用默认目录）
    async fn get_export_dir(&self) -> ConfigResult<Option<String>>;
}
