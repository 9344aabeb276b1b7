// ==========================================
// 纺纱工艺顾问 - 生成服务层
// ==========================================
// 职责: 外部文本生成能力的边界
// ==========================================

pub mod client;
pub mod gemini;
pub mod models;

pub use client::{Credentials, GenerationClient, GenerationError, AUTH_ENV_VAR};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_ENDPOINT};
pub use models::{resolve_model_list, FALLBACK_MODELS};
