// ==========================================
// 纺纱工艺顾问 - 运行编排器
// ==========================================
// 流程: 输入检查 → 计算 → 提示词构建 → 生成 → 分段 → 组装
// 红线: 任一阶段失败即中止,不产生部分报告
//       MULTI_AGENT 模式 4 个调用全部返回后才继续（汇合屏障）
//       不做重试
// ==========================================

use crate::config::YieldPolicy;
use crate::domain::plant::PlantConfiguration;
use crate::domain::prompt::PromptRequest;
use crate::domain::report::{Report, ReportMetadata};
use crate::domain::types::{GenerationMode, RunStage};
use crate::engine::calculator::YieldCalculator;
use crate::engine::error::{RunError, RunResult};
use crate::engine::events::{
    OptionalEventPublisher, RunEvent, RunEventPublisher, RunEventType,
};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::report_assembler::ReportAssembler;
use crate::engine::segmenter::ResponseSegmenter;
use crate::generation::{Credentials, GenerationClient, GenerationError};
use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RunSettings - 单次运行设置
// ==========================================
// 每次运行构造一次,显式传入；编排器不读取任何全局状态
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub model_id: String,
    pub mode: GenerationMode,
    pub credentials: Option<Credentials>,
    pub call_timeout: Option<Duration>, // 单次生成调用期限,超时按传输失败处理
    pub report_title: String,
}

// ==========================================
// AdvisoryOrchestrator
// ==========================================
pub struct AdvisoryOrchestrator<G>
where
    G: GenerationClient + ?Sized,
{
    client: Arc<G>,
    calculator: YieldCalculator,
    segmenter: ResponseSegmenter,
    assembler: ReportAssembler,
    events: OptionalEventPublisher,
}

impl<G> AdvisoryOrchestrator<G>
where
    G: GenerationClient + ?Sized,
{
    pub fn new(client: Arc<G>, policy: YieldPolicy) -> Self {
        Self {
            client,
            calculator: YieldCalculator::new(policy),
            segmenter: ResponseSegmenter::new(),
            assembler: ReportAssembler::new(),
            events: OptionalEventPublisher::none(),
        }
    }

    /// 挂接运行事件发布者（如 run_log 仓储）
    pub fn with_event_publisher(mut self, publisher: Arc<dyn RunEventPublisher>) -> Self {
        self.events = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    pub fn calculator(&self) -> &YieldCalculator {
        &self.calculator
    }

    /// 执行一次完整运行
    ///
    /// # 返回
    /// - Ok(Report): 4 栏位报告（可能降级,见 Report.degraded）
    /// - Err(RunError): 携带失败阶段；此时不产生任何报告
    #[instrument(skip(self, plant, settings), fields(
        mode = %settings.mode,
        model_id = %settings.model_id
    ))]
    pub async fn run(&self, plant: PlantConfiguration, settings: RunSettings) -> RunResult<Report> {
        let run_id = Uuid::new_v4().to_string();

        match self.execute(&run_id, plant, &settings).await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!(run_id = %run_id, stage = %e.stage(), error = %e, "运行中止");
                self.events.publish(
                    RunEvent::new(&run_id, RunEventType::RunFailed, settings.mode, &settings.model_id)
                        .with_stage(e.stage())
                        .with_detail(e.to_string()),
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        run_id: &str,
        plant: PlantConfiguration,
        settings: &RunSettings,
    ) -> RunResult<Report> {
        // ==========================================
        // 步骤1: 必填输入检查
        // ==========================================
        let credentials = settings.credentials.as_ref().ok_or(RunError::MissingInput {
            field: "credentials",
        })?;
        if !plant.has_fiber_description() {
            return Err(RunError::MissingInput {
                field: "fiber_description",
            });
        }
        if settings.model_id.trim().is_empty() {
            return Err(RunError::MissingInput { field: "model_id" });
        }

        info!(run_id = %run_id, "开始运行");
        self.events.publish(RunEvent::new(
            run_id,
            RunEventType::RunStarted,
            settings.mode,
            &settings.model_id,
        ));

        // ==========================================
        // 步骤2: 产量计算
        // ==========================================
        let metrics = self.calculator.compute_metrics(&plant)?;
        debug!(
            tpi = metrics.twist_per_inch,
            daily_tonnage = metrics.daily_tonnage,
            "产量计算完成"
        );

        // ==========================================
        // 步骤3: 提示词构建
        // ==========================================
        let builder = PromptBuilder::new(settings.mode, self.calculator.policy().clone());
        let requests = builder.build(&plant, Some(&metrics), &settings.model_id);
        debug!(request_count = requests.len(), "提示词构建完成");

        // ==========================================
        // 步骤4: 生成（MULTI_AGENT 并发 + 汇合）
        // ==========================================
        let raw = self
            .dispatch(&requests, credentials, settings.call_timeout)
            .await?;

        let total_chars: usize = raw.iter().map(|r| r.len()).sum();
        info!(responses = raw.len(), total_chars, "生成调用全部返回");
        self.events.publish(
            RunEvent::new(
                run_id,
                RunEventType::GenerationCompleted,
                settings.mode,
                &settings.model_id,
            )
            .with_payload(json!({ "responses": raw.len(), "total_chars": total_chars })),
        );

        // ==========================================
        // 步骤5: 分段
        // ==========================================
        let raw: Vec<Option<String>> = raw.into_iter().map(Some).collect();
        let outcome = self.segmenter.segment(settings.mode, &raw);

        if outcome.degraded {
            warn!(
                run_id = %run_id,
                piece_count = outcome.piece_count,
                "分段降级,使用占位栏位"
            );
            self.events.publish(
                RunEvent::new(
                    run_id,
                    RunEventType::SegmentationDegraded,
                    settings.mode,
                    &settings.model_id,
                )
                .with_stage(RunStage::Segmentation)
                .with_payload(json!({ "piece_count": outcome.piece_count })),
            );
        }

        // ==========================================
        // 步骤6: 组装
        // ==========================================
        let metadata = ReportMetadata {
            report_id: Uuid::new_v4().to_string(),
            title: settings.report_title.clone(),
            created_at: Utc::now(),
            model_id: settings.model_id.clone(),
            mode: settings.mode,
            input_echo: plant.echo_lines(),
            metric_lines: metrics.summary_lines(),
        };
        let document = self.assembler.assemble(&metadata, &outcome.sections);

        info!(
            run_id = %run_id,
            report_id = %metadata.report_id,
            degraded = outcome.degraded,
            "报告组装完成"
        );
        self.events.publish(
            RunEvent::new(
                run_id,
                RunEventType::ReportAssembled,
                settings.mode,
                &settings.model_id,
            )
            .with_stage(RunStage::Assembly)
            .with_report(&metadata.report_id)
            .with_payload(json!({
                "degraded": outcome.degraded,
                "piece_count": outcome.piece_count,
            })),
        );

        Ok(Report {
            metadata,
            plant,
            metrics,
            sections: outcome.sections,
            degraded: outcome.degraded,
            document,
        })
    }

    /// 发出全部请求并等待全部返回
    ///
    /// 任一失败则整体失败；scope 列出全部失败的请求
    async fn dispatch(
        &self,
        requests: &[PromptRequest],
        credentials: &Credentials,
        call_timeout: Option<Duration>,
    ) -> RunResult<Vec<String>> {
        let calls = requests
            .iter()
            .map(|request| self.generate_one(request, credentials, call_timeout));
        let results = join_all(calls).await;

        let mut responses = Vec::with_capacity(results.len());
        let mut failed_scopes = Vec::new();
        let mut first_error: Option<GenerationError> = None;

        for (request, result) in requests.iter().zip(results) {
            let scope = request_scope(request);
            match result {
                Ok(text) => responses.push(text),
                Err(e) => {
                    warn!(scope = %scope, code = e.code(), error = %e, "生成调用失败");
                    failed_scopes.push(scope);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(source) => Err(RunError::Generation {
                scope: failed_scopes.join(","),
                source,
            }),
            None => Ok(responses),
        }
    }

    async fn generate_one(
        &self,
        request: &PromptRequest,
        credentials: &Credentials,
        call_timeout: Option<Duration>,
    ) -> Result<String, GenerationError> {
        let call = self
            .client
            .generate(&request.text, &request.model_id, credentials);

        match call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Transport(format!(
                    "生成调用超时 ({} ms)",
                    limit.as_millis()
                ))),
            },
            None => call.await,
        }
    }
}

fn request_scope(request: &PromptRequest) -> String {
    match request.topic {
        Some(slot) => slot.to_string(),
        None => GenerationMode::Unified.to_string(),
    }
}
