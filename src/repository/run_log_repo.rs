// ==========================================
// 纺纱工艺顾问 - 运行日志数据仓储
// ==========================================
// 对齐: run_log 表
// 说明: 实现 RunEventPublisher,编排器事件直接落为审计行
// ==========================================

use crate::domain::run_log::RunLog;
use crate::engine::events::{RunEvent, RunEventPublisher};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::error::Error;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct RunLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RunLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入运行日志
    pub fn insert(&self, log: &RunLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO run_log (
                log_id, run_id, event_type, event_ts, mode,
                model_id, stage, report_id, payload_json, detail
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                log.log_id,
                log.run_id,
                log.event_type,
                log.event_ts.format(TS_FORMAT).to_string(),
                log.mode,
                log.model_id,
                log.stage,
                log.report_id,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;

        Ok(log.log_id.clone())
    }

    /// 查询一次运行的全部日志（按写入顺序）
    pub fn find_by_run_id(&self, run_id: &str) -> RepositoryResult<Vec<RunLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, run_id, event_type, event_ts, mode,
                   model_id, stage, report_id, payload_json, detail
            FROM run_log
            WHERE run_id = ?
            ORDER BY rowid ASC
            "#,
        )?;

        let logs = stmt
            .query_map(params![run_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 最近的日志（新 → 旧）
    pub fn list_recent(&self, limit: u32) -> RepositoryResult<Vec<RunLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, run_id, event_type, event_ts, mode,
                   model_id, stage, report_id, payload_json, detail
            FROM run_log
            ORDER BY rowid DESC
            LIMIT ?
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }
}

impl RunEventPublisher for RunLogRepository {
    fn publish(&self, event: RunEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        let log = RunLog {
            log_id: Uuid::new_v4().to_string(),
            run_id: event.run_id,
            event_type: event.event_type.as_str().to_string(),
            event_ts: Utc::now().naive_utc(),
            mode: Some(event.mode.to_string()),
            model_id: Some(event.model_id),
            stage: event.stage.map(|s| s.to_string()),
            report_id: event.report_id,
            payload_json: event.payload,
            detail: event.detail,
        };

        self.insert(&log)?;
        Ok(())
    }
}

fn map_row(row: &Row) -> SqliteResult<RunLog> {
    let event_ts_str: String = row.get(3)?;
    let event_ts = NaiveDateTime::parse_from_str(&event_ts_str, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let payload_json_str: Option<String> = row.get(8)?;
    let payload_json = payload_json_str.and_then(|s| serde_json::from_str(&s).ok());

    Ok(RunLog {
        log_id: row.get(0)?,
        run_id: row.get(1)?,
        event_type: row.get(2)?,
        event_ts,
        mode: row.get(4)?,
        model_id: row.get(5)?,
        stage: row.get(6)?,
        report_id: row.get(7)?,
        payload_json,
        detail: row.get(9)?,
    })
}
