// ==========================================
// 纺纱工艺顾问 - 运行日志领域模型
// ==========================================
// 用途: 审计追踪,每次运行的关键事件都记录一行
// 对齐: run_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// RunLog - 运行日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub log_id: String,
    pub run_id: String,
    pub event_type: String,        // RunEventType 字符串
    pub event_ts: NaiveDateTime,
    pub mode: Option<String>,
    pub model_id: Option<String>,
    pub stage: Option<String>,     // 失败阶段 / 完成阶段
    pub report_id: Option<String>, // 成功时关联报告
    pub payload_json: Option<JsonValue>,
    pub detail: Option<String>,
}

// ==========================================
// RunOutcome - 运行结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Succeeded, // 完整报告
    Degraded,  // 报告已生成,但分段降级
    Failed,    // 运行中止,无报告
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Succeeded => write!(f, "SUCCEEDED"),
            RunOutcome::Degraded => write!(f, "DEGRADED"),
            RunOutcome::Failed => write!(f, "FAILED"),
        }
    }
}
