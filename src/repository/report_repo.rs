// ==========================================
// 纺纱工艺顾问 - 报告数据仓储
// ==========================================
// 对齐: advisory_report 表
// 红线: 报告不可变,只插入不更新
// ==========================================

use crate::domain::report::{Report, ReportMetadata, ReportSections};
use crate::domain::types::GenerationMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 报告列表行（不含正文）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub model_id: String,
    pub mode: GenerationMode,
    pub degraded: bool,
}

// ==========================================
// ReportRepository - 报告仓储
// ==========================================
pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入报告
    ///
    /// # 返回
    /// - `Ok(report_id)`
    /// - `Err(UniqueConstraintViolation)`: 同一报告重复写入
    pub fn insert(&self, report: &Report) -> RepositoryResult<String> {
        let plant_json = serde_json::to_string(&report.plant)?;
        let metrics_json = serde_json::to_string(&report.metrics)?;
        let sections_json = serde_json::to_string(&report.sections)?;
        let metadata_json = serde_json::to_string(&report.metadata)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO advisory_report (
                report_id, title, created_at, model_id, mode, degraded,
                plant_json, metrics_json, sections_json, metadata_json, document
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                report.metadata.report_id,
                report.metadata.title,
                report.metadata.created_at.format(TS_FORMAT).to_string(),
                report.metadata.model_id,
                report.metadata.mode.to_string(),
                report.degraded,
                plant_json,
                metrics_json,
                sections_json,
                metadata_json,
                report.document,
            ],
        )?;

        Ok(report.metadata.report_id.clone())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 report_id 查询完整报告
    pub fn find_by_id(&self, report_id: &str) -> RepositoryResult<Option<Report>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT degraded, plant_json, metrics_json, sections_json, metadata_json, document
            FROM advisory_report
            WHERE report_id = ?
            "#,
        )?;

        match stmt.query_row(params![report_id], map_report_row) {
            Ok(report) => Ok(Some(report)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 最近的报告（新 → 旧）
    pub fn list_recent(&self, limit: u32) -> RepositoryResult<Vec<ReportSummary>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT report_id, title, created_at, model_id, mode, degraded
            FROM advisory_report
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit], map_summary_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM advisory_report", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> SqliteResult<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn map_report_row(row: &Row) -> SqliteResult<Report> {
    let degraded: bool = row.get(0)?;
    let plant = json_column(row, 1)?;
    let metrics = json_column(row, 2)?;
    let sections: ReportSections = json_column(row, 3)?;
    let metadata: ReportMetadata = json_column(row, 4)?;
    let document: String = row.get(5)?;

    Ok(Report {
        metadata,
        plant,
        metrics,
        sections,
        degraded,
        document,
    })
}

fn map_summary_row(row: &Row) -> SqliteResult<ReportSummary> {
    let created_at_str: String = row.get(2)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let mode_str: String = row.get(4)?;
    let mode = mode_str.parse::<GenerationMode>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(ReportSummary {
        report_id: row.get(0)?,
        title: row.get(1)?,
        created_at,
        model_id: row.get(3)?,
        mode,
        degraded: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::ComputedMetrics;
    use crate::domain::plant::PlantConfiguration;
    use chrono::{Duration, TimeZone, Utc};

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn make_report(report_id: &str, minutes: i64) -> Report {
        let created_at = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap() + Duration::minutes(minutes);
        Report {
            metadata: ReportMetadata {
                report_id: report_id.to_string(),
                title: "SPINNING ADVISORY REPORT".to_string(),
                created_at,
                model_id: "gemini-pro".to_string(),
                mode: GenerationMode::MultiAgent,
                input_echo: vec!["Target: Ne 30, TM 4".to_string()],
                metric_lines: vec!["TPI: 21.909".to_string()],
            },
            plant: PlantConfiguration::with_fiber("Giza 86"),
            metrics: ComputedMetrics {
                twist_per_inch: 21.909,
                grams_per_spindle_per_shift: 190.0,
                ring_production_kg_hr: 593.75,
                daily_tonnage: 14.25,
                blowroom_feed_kg_hr: 680.0,
                blowroom_required_kg_hr: 593.75,
                blowroom_balanced: true,
                cards_required: 10,
                winding_capacity_kg_hr: 810.0,
                winding_balanced: true,
            },
            sections: ReportSections::new(
                "f".to_string(),
                "g".to_string(),
                "y".to_string(),
                "s".to_string(),
            ),
            degraded: false,
            document: "doc".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let repo = ReportRepository::new(setup_test_db());
        let report = make_report("r1", 0);

        assert_eq!(repo.insert(&report).unwrap(), "r1");
        let found = repo.find_by_id("r1").unwrap().unwrap();
        assert_eq!(found, report);
        assert!(repo.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let repo = ReportRepository::new(setup_test_db());
        let report = make_report("r1", 0);
        repo.insert(&report).unwrap();

        let err = repo.insert(&report).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_list_recent_orders_newest_first() {
        let repo = ReportRepository::new(setup_test_db());
        repo.insert(&make_report("old", 0)).unwrap();
        repo.insert(&make_report("new", 30)).unwrap();
        repo.insert(&make_report("mid", 10)).unwrap();

        let ids: Vec<String> = repo
            .list_recent(2)
            .unwrap()
            .into_iter()
            .map(|s| s.report_id)
            .collect();
        assert_eq!(ids, vec!["new", "mid"]);

        let summary = &repo.list_recent(1).unwrap()[0];
        assert_eq!(summary.mode, GenerationMode::MultiAgent);
        assert!(!summary.degraded);
    }
}
