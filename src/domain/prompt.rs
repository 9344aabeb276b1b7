// ==========================================
// 纺纱工艺顾问 - 提示词请求
// ==========================================
// 说明: 对生成服务而言只是一段不透明文本 + 模型标识
// ==========================================

use crate::domain::types::SectionSlot;
use serde::{Deserialize, Serialize};

/// 发往生成服务的单个请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// 提示词全文
    pub text: String,
    /// 模型标识
    pub model_id: String,
    /// 多代理模式下该请求负责的栏位；统一模式为 None
    pub topic: Option<SectionSlot>,
}

impl PromptRequest {
    pub fn unified(text: String, model_id: impl Into<String>) -> Self {
        Self {
            text,
            model_id: model_id.into(),
            topic: None,
        }
    }

    pub fn for_topic(text: String, model_id: impl Into<String>, topic: SectionSlot) -> Self {
        Self {
            text,
            model_id: model_id.into(),
            topic: Some(topic),
        }
    }
}
