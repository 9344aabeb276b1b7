// ==========================================
// 纺纱工艺顾问 - 生成服务客户端边界
// ==========================================
// 职责: 提示词 → 原始文本
// 红线: 不做内部重试；输出视为不可信文本
// ==========================================

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// 生成服务 API Key 的环境变量
pub const AUTH_ENV_VAR: &str = "GEMINI_API_KEY";

// ==========================================
// Credentials - 调用凭证
// ==========================================
// 每次运行构造一次,按值传入各调用；Debug 输出脱敏
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// 空白 key 视为缺失
    pub fn new(api_key: impl Into<String>) -> Option<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            None
        } else {
            Some(Self { api_key })
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(AUTH_ENV_VAR).ok().and_then(Self::new)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .finish()
    }
}

// ==========================================
// GenerationError - 生成服务错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("认证失败: {0}")]
    Auth(String),

    #[error("传输失败: {0}")]
    Transport(String),

    #[error("生成服务未返回文本 (model={model_id})")]
    EmptyResponse { model_id: String },
}

impl GenerationError {
    /// 错误代码（供 API 层映射）
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Auth(_) => "AUTH_ERROR",
            GenerationError::Transport(_) => "TRANSPORT_ERROR",
            GenerationError::EmptyResponse { .. } => "EMPTY_RESPONSE",
        }
    }
}

// ==========================================
// GenerationClient Trait
// ==========================================
// 实现者: GeminiClient（HTTP+JSON）；测试中为脚本化 Mock
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// 发送提示词并返回原始文本
    ///
    /// # 错误
    /// - Auth: 凭证缺失/无效
    /// - Transport: 网络或服务故障
    /// - EmptyResponse: 服务未返回文本
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        credentials: &Credentials,
    ) -> Result<String, GenerationError>;
}
