// ==========================================
// 纺纱工艺顾问 - 引擎层事件发布
// ==========================================
// 职责: 定义运行事件发布 trait,实现依赖倒置
// 说明: Engine 层定义 trait,Repository 层 (run_log) 实现
// ==========================================

use crate::domain::types::{GenerationMode, RunStage};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 运行事件类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEventType {
    /// 运行开始（输入检查已通过）
    RunStarted,
    /// 全部生成调用已返回
    GenerationCompleted,
    /// 分段降级（不是失败）
    SegmentationDegraded,
    /// 报告组装完成
    ReportAssembled,
    /// 运行中止
    RunFailed,
}

impl RunEventType {
    pub fn as_str(&self) -> &str {
        match self {
            RunEventType::RunStarted => "RunStarted",
            RunEventType::GenerationCompleted => "GenerationCompleted",
            RunEventType::SegmentationDegraded => "SegmentationDegraded",
            RunEventType::ReportAssembled => "ReportAssembled",
            RunEventType::RunFailed => "RunFailed",
        }
    }
}

/// 运行事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub run_id: String,
    pub event_type: RunEventType,
    pub mode: GenerationMode,
    pub model_id: String,
    pub stage: Option<RunStage>,
    pub report_id: Option<String>,
    pub detail: Option<String>,
    pub payload: Option<JsonValue>,
}

impl RunEvent {
    pub fn new(
        run_id: impl Into<String>,
        event_type: RunEventType,
        mode: GenerationMode,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            event_type,
            mode,
            model_id: model_id.into(),
            stage: None,
            report_id: None,
            detail: None,
            payload: None,
        }
    }

    pub fn with_stage(mut self, stage: RunStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_report(mut self, report_id: impl Into<String>) -> Self {
        self.report_id = Some(report_id.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = Some(payload);
        self
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 运行事件发布者
///
/// 发布失败只记录日志,不影响运行结果
pub trait RunEventPublisher: Send + Sync {
    fn publish(&self, event: RunEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者（单元测试、metrics 子命令）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl RunEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: RunEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            run_id = %event.run_id,
            event_type = event.event_type.as_str(),
            "NoOpEventPublisher: 跳过事件发布"
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn RunEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn RunEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件；失败时记录 warn 并吞掉错误
    pub fn publish(&self, event: RunEvent) {
        let publisher = match &self.inner {
            Some(p) => p,
            None => return,
        };

        let run_id = event.run_id.clone();
        let event_type = event.event_type;
        if let Err(e) = publisher.publish(event) {
            tracing::warn!(
                run_id = %run_id,
                event_type = event_type.as_str(),
                error = %e,
                "运行事件发布失败"
            );
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
