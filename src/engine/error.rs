// ==========================================
// 纺纱工艺顾问 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 分段降级不是错误,不在此列
// ==========================================

use crate::domain::types::RunStage;
use crate::generation::GenerationError;
use thiserror::Error;

/// 数值输入校验错误（计算器）
///
/// 从不静默截断,必须指明出错字段
#[derive(Error, Debug, Clone, PartialEq)]
#[error("输入校验失败 (字段 {field}): {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 一次运行的终止性错误
///
/// 任一阶段出错即中止,不产生任何部分报告
#[derive(Error, Debug)]
pub enum RunError {
    #[error("缺少必填输入: {field}")]
    MissingInput { field: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// scope: UNIFIED 或失败的栏位列表（逗号分隔）
    #[error("生成服务调用失败 ({scope}): {source}")]
    Generation {
        scope: String,
        #[source]
        source: GenerationError,
    },
}

impl RunError {
    /// 出错阶段
    pub fn stage(&self) -> RunStage {
        match self {
            RunError::MissingInput { .. } => RunStage::InputCheck,
            RunError::Validation(_) => RunStage::Calculation,
            RunError::Generation { .. } => RunStage::Generation,
        }
    }

    /// 面向用户的单行描述（包含阶段）
    pub fn user_message(&self) -> String {
        format!("[{}] {}", self.stage(), self)
    }
}

pub type RunResult<T> = Result<T, RunError>;
