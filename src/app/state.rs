// ==========================================
// 纺纱工艺顾问 - 应用状态
// ==========================================
// 职责: 从数据库路径装配配置、仓储、生成客户端与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::AdvisoryApi;
use crate::config::{AdvisorConfigReader, ConfigManager};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::generation::{GeminiClient, GenerationClient};
use crate::repository::{ReportRepository, RunLogRepository};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器（读写 config_kv）
    pub config_manager: Arc<ConfigManager>,

    /// 顾问API
    pub advisory_api: Arc<AdvisoryApi>,

    /// 报告仓储
    pub report_repo: Arc<ReportRepository>,

    /// 运行日志仓储（审计追踪）
    pub run_log_repo: Arc<RunLogRepository>,
}

impl AppState {
    /// 创建 AppState,生成客户端使用 Gemini
    ///
    /// 服务地址与超时从配置读取
    pub async fn new(db_path: String) -> Result<Self, String> {
        let conn = open_and_migrate(&db_path)?;
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));

        let endpoint = config_manager
            .get_generation_endpoint()
            .await
            .map_err(|e| format!("读取生成服务地址失败: {}", e))?;
        let timeout = config_manager
            .get_call_timeout()
            .await
            .map_err(|e| format!("读取调用超时失败: {}", e))?;

        let client = GeminiClient::new(endpoint, timeout)
            .map_err(|e| format!("生成客户端初始化失败: {}", e))?;

        Ok(Self::assemble(db_path, conn, config_manager, Arc::new(client)))
    }

    /// 使用指定生成客户端创建 AppState
    pub fn with_client(db_path: String, client: Arc<dyn GenerationClient>) -> Result<Self, String> {
        let conn = open_and_migrate(&db_path)?;
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        Ok(Self::assemble(db_path, conn, config_manager, client))
    }

    fn assemble(
        db_path: String,
        conn: Arc<Mutex<rusqlite::Connection>>,
        config_manager: Arc<ConfigManager>,
        client: Arc<dyn GenerationClient>,
    ) -> Self {
        let report_repo = Arc::new(ReportRepository::new(conn.clone()));
        let run_log_repo = Arc::new(RunLogRepository::new(conn));

        let advisory_api = Arc::new(AdvisoryApi::new(
            config_manager.clone(),
            client,
            report_repo.clone(),
            run_log_repo.clone(),
        ));

        tracing::info!(db_path = %db_path, "AppState 初始化完成");

        Self {
            db_path,
            config_manager,
            advisory_api,
            report_repo,
            run_log_repo,
        }
    }
}

fn open_and_migrate(db_path: &str) -> Result<Arc<Mutex<rusqlite::Connection>>, String> {
    tracing::info!("初始化AppState，数据库路径: {}", db_path);

    let conn = open_sqlite_connection(db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
    ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 默认数据库路径
///
/// 优先级: 环境变量 SPINNING_ADVISOR_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("SPINNING_ADVISOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./spinning_advisor.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("spinning-advisor");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("spinning_advisor.db");
        }
    }

    path.to_string_lossy().to_string()
}
