// ==========================================
// 纺纱工艺顾问 - 顾问 API
// ==========================================
// 职责:
// 1. 发起模拟运行（读取配置 → 编排器 → 持久化报告）
// 2. 报告查询与导出
// 3. 本地产量计算（不调用生成服务）
// 4. 可选模型列表
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::export;
use crate::config::AdvisorConfigReader;
use crate::domain::metrics::ComputedMetrics;
use crate::domain::plant::PlantConfiguration;
use crate::domain::report::Report;
use crate::domain::run_log::RunLog;
use crate::domain::types::GenerationMode;
use crate::engine::calculator::YieldCalculator;
use crate::engine::error::RunError;
use crate::engine::orchestrator::{AdvisoryOrchestrator, RunSettings};
use crate::generation::{resolve_model_list, Credentials, GenerationClient};
use crate::repository::{ReportRepository, ReportSummary, RunLogRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// RunRequest - 运行请求
// ==========================================
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub plant: PlantConfiguration,
    pub mode: Option<GenerationMode>, // None: 使用配置
    pub model_id: Option<String>,     // None: 使用配置
    pub credentials: Option<Credentials>,
}

impl RunRequest {
    pub fn new(plant: PlantConfiguration, credentials: Option<Credentials>) -> Self {
        Self {
            plant,
            mode: None,
            model_id: None,
            credentials,
        }
    }
}

// ==========================================
// AdvisoryApi
// ==========================================
pub struct AdvisoryApi {
    config: Arc<dyn AdvisorConfigReader>,
    client: Arc<dyn GenerationClient>,
    report_repo: Arc<ReportRepository>,
    run_log_repo: Arc<RunLogRepository>,
}

impl AdvisoryApi {
    pub fn new(
        config: Arc<dyn AdvisorConfigReader>,
        client: Arc<dyn GenerationClient>,
        report_repo: Arc<ReportRepository>,
        run_log_repo: Arc<RunLogRepository>,
    ) -> Self {
        Self {
            config,
            client,
            report_repo,
            run_log_repo,
        }
    }

    // ==========================================
    // 运行
    // ==========================================

    /// 发起一次模拟运行
    ///
    /// 成功时报告已持久化；失败时不写入任何报告
    #[instrument(skip(self, request))]
    pub async fn run_simulation(&self, request: RunRequest) -> ApiResult<Report> {
        let mode = match request.mode {
            Some(mode) => mode,
            None => self.config.get_generation_mode().await.map_err(config_err)?,
        };
        let model_id = match request.model_id {
            Some(model_id) => model_id,
            None => self.config.get_model_id().await.map_err(config_err)?,
        };

        let settings = RunSettings {
            model_id,
            mode,
            credentials: request.credentials,
            call_timeout: Some(self.config.get_call_timeout().await.map_err(config_err)?),
            report_title: self.config.get_report_title().await.map_err(config_err)?,
        };
        let policy = self.config.get_yield_policy().await.map_err(config_err)?;

        let orchestrator = AdvisoryOrchestrator::new(self.client.clone(), policy)
            .with_event_publisher(self.run_log_repo.clone());

        let report = orchestrator.run(request.plant, settings).await?;
        self.report_repo.insert(&report)?;

        info!(
            report_id = %report.report_id(),
            degraded = report.degraded,
            "报告已保存"
        );
        Ok(report)
    }

    /// 仅执行本地产量计算
    pub async fn compute_metrics(&self, plant: &PlantConfiguration) -> ApiResult<ComputedMetrics> {
        let policy = self.config.get_yield_policy().await.map_err(config_err)?;
        let metrics = YieldCalculator::new(policy)
            .compute_metrics(plant)
            .map_err(RunError::from)?;
        Ok(metrics)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn list_reports(&self, limit: u32) -> ApiResult<Vec<ReportSummary>> {
        Ok(self.report_repo.list_recent(limit)?)
    }

    pub fn get_report(&self, report_id: &str) -> ApiResult<Report> {
        self.report_repo
            .find_by_id(report_id)?
            .ok_or_else(|| ApiError::NotFound(format!("报告(id={})不存在", report_id)))
    }

    pub fn recent_run_logs(&self, limit: u32) -> ApiResult<Vec<RunLog>> {
        Ok(self.run_log_repo.list_recent(limit)?)
    }

    /// 可选模型列表（外部发现为空时使用兜底列表）
    pub fn available_models(&self, discovered: &[String]) -> Vec<String> {
        resolve_model_list(discovered)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出报告
    ///
    /// # 参数
    /// - dir: 导出目录；None 时使用配置 report_export_dir
    pub async fn export_report(&self, report_id: &str, dir: Option<&Path>) -> ApiResult<PathBuf> {
        let report = self.get_report(report_id)?;

        let dir = self
            .resolve_export_dir(dir)
            .await?
            .ok_or_else(|| ApiError::InvalidInput("未配置导出目录".to_string()))?;

        export::write_report(&report, &dir)
    }

    /// 运行后自动导出
    ///
    /// 显式目录优先,其次配置 report_export_dir；两者均无时不导出,返回 None
    pub async fn export_after_run(
        &self,
        report_id: &str,
        dir: Option<&Path>,
    ) -> ApiResult<Option<PathBuf>> {
        match self.resolve_export_dir(dir).await? {
            Some(dir) => {
                let report = self.get_report(report_id)?;
                export::write_report(&report, &dir).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn resolve_export_dir(&self, dir: Option<&Path>) -> ApiResult<Option<PathBuf>> {
        match dir {
            Some(dir) => Ok(Some(dir.to_path_buf())),
            None => Ok(self
                .config
                .get_export_dir()
                .await
                .map_err(config_err)?
                .map(PathBuf::from)),
        }
    }
}

fn config_err(e: Box<dyn std::error::Error + Send + Sync>) -> ApiError {
    ApiError::ConfigError(e.to_string())
}
