// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use spinning_advisor::config::{AdvisorConfigReader, ConfigResult, YieldPolicy};
use spinning_advisor::domain::types::GenerationMode;
use std::time::Duration;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub model_id: String,
    pub mode: GenerationMode,
    pub call_timeout: Duration,
    pub endpoint: String,
    pub yield_policy: YieldPolicy,
    pub report_title: String,
    pub export_dir: Option<String>,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            model_id: "gemini-1.5-flash".to_string(),
            mode: GenerationMode::Unified,
            call_timeout: Duration::from_secs(5),
            endpoint: "http://127.0.0.1:9".to_string(),
            yield_policy: YieldPolicy::default(),
            report_title: "MOCK SPINNING REPORT".to_string(),
            export_dir: None,
        }
    }

    /// 多代理模式配置
    pub fn multi_agent() -> Self {
        let mut config = Self::default();
        config.mode = GenerationMode::MultiAgent;
        config
    }

    pub fn with_export_dir(dir: &str) -> Self {
        let mut config = Self::default();
        config.export_dir = Some(dir.to_string());
        config
    }
}

#[async_trait]
impl AdvisorConfigReader for MockConfig {
    async fn get_model_id(&self) -> ConfigResult<String> {
        Ok(self.model_id.clone())
    }

    async fn get_generation_mode(&self) -> ConfigResult<GenerationMode> {
        Ok(self.mode)
    }

    async fn get_call_timeout(&self) -> ConfigResult<Duration> {
        Ok(self.call_timeout)
    }

    async fn get_generation_endpoint(&self) -> ConfigResult<String> {
        Ok(self.endpoint.clone())
    }

    async fn get_yield_policy(&self) -> ConfigResult<YieldPolicy> {
        Ok(self.yield_policy.clone())
    }

    async fn get_report_title(&self) -> ConfigResult<String> {
        Ok(self.report_title.clone())
    }

    async fn get_export_dir(&self) -> ConfigResult<Option<String>> {
        Ok(self.export_dir.clone())
    }
}
