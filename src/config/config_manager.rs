// ==========================================
// 纺纱工艺顾问 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 键不存在或值无法解析时回落到编译期默认值
// ==========================================

use crate::config::advisor_config_trait::{AdvisorConfigReader, ConfigResult};
use crate::config::yield_policy::YieldPolicy;
use crate::db::open_sqlite_connection;
use crate::domain::types::GenerationMode;
use crate::generation::gemini::DEFAULT_GEMINI_ENDPOINT;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const MODEL_ID: &str = "gemini-1.5-flash";
    pub const GENERATION_MODE: &str = "UNIFIED";
    pub const CALL_TIMEOUT_SECS: u64 = 60;
    pub const REPORT_TITLE: &str = "SPINNING ADVISORY REPORT";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入产量公式系数（JSON）
    pub fn set_yield_policy(&self, policy: &YieldPolicy) -> ConfigResult<()> {
        let raw = serde_json::to_string(policy)?;
        self.set_global_config_value(config_keys::YIELD_POLICY, &raw)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 运行日志中记录当时生效的配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

#[async_trait]
impl AdvisorConfigReader for ConfigManager {
    async fn get_model_id(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::GENERATION_MODEL_ID, defaults::MODEL_ID)
    }

    async fn get_generation_mode(&self) -> ConfigResult<GenerationMode> {
        let value =
            self.get_config_or_default(config_keys::GENERATION_MODE, defaults::GENERATION_MODE)?;
        match value.parse::<GenerationMode>() {
            Ok(mode) => Ok(mode),
            Err(e) => {
                warn!(value = %value, error = %e, "生成模式配置无效,使用 UNIFIED");
                Ok(GenerationMode::Unified)
            }
        }
    }

    async fn get_call_timeout(&self) -> ConfigResult<Duration> {
        let value = self.get_config_or_default(
            config_keys::GENERATION_CALL_TIMEOUT_SECS,
            &defaults::CALL_TIMEOUT_SECS.to_string(),
        )?;
        let secs = value
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(defaults::CALL_TIMEOUT_SECS);
        Ok(Duration::from_secs(secs))
    }

    async fn get_generation_endpoint(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::GENERATION_ENDPOINT, DEFAULT_GEMINI_ENDPOINT)
    }

    async fn get_yield_policy(&self) -> ConfigResult<YieldPolicy> {
        let raw = match self.get_config_value(config_keys::YIELD_POLICY)? {
            Some(v) => v,
            None => return Ok(YieldPolicy::default()),
        };

        match serde_json::from_str::<YieldPolicy>(&raw) {
            Ok(policy) => Ok(policy),
            Err(e) => {
                warn!(error = %e, "产量公式配置解析失败,使用默认系数");
                Ok(YieldPolicy::default())
            }
        }
    }

    async fn get_report_title(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::REPORT_TITLE, defaults::REPORT_TITLE)
    }

    async fn get_export_dir(&self) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::REPORT_EXPORT_DIR)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 生成服务
    pub const GENERATION_MODEL_ID: &str = "generation_model_id";
    pub const GENERATION_MODE: &str = "generation_mode";
    pub const GENERATION_CALL_TIMEOUT_SECS: &str = "generation_call_timeout_secs";
    pub const GENERATION_ENDPOINT: &str = "generation_endpoint";

    // 产量公式 (JSON)
    pub const YIELD_POLICY: &str = "yield_policy";

    // 报告
    pub const REPORT_TITLE: &str = "report_title";
    pub const REPORT_EXPORT_DIR: &str = "report_export_dir";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let manager = setup_manager();

        assert_eq!(manager.get_model_id().await.unwrap(), "gemini-1.5-flash");
        assert_eq!(
            manager.get_generation_mode().await.unwrap(),
            GenerationMode::Unified
        );
        assert_eq!(
            manager.get_call_timeout().await.unwrap(),
            Duration::from_secs(60)
        );
        assert_eq!(manager.get_yield_policy().await.unwrap(), YieldPolicy::default());
        assert!(manager.get_export_dir().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overrides_are_read() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::GENERATION_MODE, "multi-agent")
            .unwrap();
        manager
            .set_global_config_value(config_keys::GENERATION_MODEL_ID, "gemini-pro")
            .unwrap();

        let mut policy = YieldPolicy::default();
        policy.shift_hours = 12.0;
        policy.shifts_per_day = 2;
        manager.set_yield_policy(&policy).unwrap();

        assert_eq!(
            manager.get_generation_mode().await.unwrap(),
            GenerationMode::MultiAgent
        );
        assert_eq!(manager.get_model_id().await.unwrap(), "gemini-pro");
        assert_eq!(manager.get_yield_policy().await.unwrap(), policy);

        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(snapshot.contains("generation_mode"));
    }

    #[tokio::test]
    async fn test_invalid_values_fall_back() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::GENERATION_MODE, "swarm")
            .unwrap();
        manager
            .set_global_config_value(config_keys::GENERATION_CALL_TIMEOUT_SECS, "0")
            .unwrap();
        manager
            .set_global_config_value(config_keys::YIELD_POLICY, "{not json")
            .unwrap();

        assert_eq!(
            manager.get_generation_mode().await.unwrap(),
            GenerationMode::Unified
        );
        assert_eq!(
            manager.get_call_timeout().await.unwrap(),
            Duration::from_secs(60)
        );
        assert_eq!(manager.get_yield_policy().await.unwrap(), YieldPolicy::default());
    }
}
