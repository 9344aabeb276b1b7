// ==========================================
// 纺纱工艺顾问 - 报告导出
// ==========================================
// 文件名: <前缀>_<YYYY-MM-DD>_<短 ID>.txt
// 内容: 组装器产出的纯文本文档,原样写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::report::Report;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_FILE_PREFIX: &str = "Spinning_Report";

const SHORT_ID_CHARS: usize = 8;

/// 导出文件名
pub fn export_file_name(report: &Report) -> String {
    let short_id: String = report
        .report_id()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(SHORT_ID_CHARS)
        .collect();

    format!(
        "{}_{}_{}.txt",
        EXPORT_FILE_PREFIX,
        report.metadata.created_at.format("%Y-%m-%d"),
        short_id
    )
}

/// 写入导出文件（目录不存在时创建）
///
/// # 返回
/// - Ok(PathBuf): 写入的文件路径
pub fn write_report(report: &Report, dir: &Path) -> ApiResult<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| ApiError::ExportError(format!("无法创建目录 {}: {}", dir.display(), e)))?;

    let path = dir.join(export_file_name(report));
    fs::write(&path, &report.document)
        .map_err(|e| ApiError::ExportError(format!("无法写入 {}: {}", path.display(), e)))?;

    info!(report_id = %report.report_id(), path = %path.display(), "报告已导出");
    Ok(path)
}
