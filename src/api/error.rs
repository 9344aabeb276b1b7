// ==========================================
// 纺纱工艺顾问 - API层错误类型
// ==========================================
// 职责: 把引擎/仓储错误转换为带稳定错误代码的用户错误
// 红线: 运行失败的消息必须指明失败阶段
// ==========================================

use crate::domain::types::RunStage;
use crate::engine::error::RunError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 运行错误
    // ==========================================
    /// 一次运行中止（不产生报告）
    #[error("运行失败 [{stage}]: {message}")]
    RunFailed {
        code: &'static str,
        stage: RunStage,
        message: String,
    },

    // ==========================================
    // 业务错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error("报告导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::RunFailed { code, .. } => code,
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RunError 转换
// ==========================================
impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        let code = match &err {
            RunError::MissingInput { .. } => "MISSING_INPUT",
            RunError::Validation(_) => "VALIDATION_ERROR",
            RunError::Generation { source, .. } => source.code(),
        };

        ApiError::RunFailed {
            code,
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ValidationError;
    use crate::generation::GenerationError;

    #[test]
    fn test_run_error_codes() {
        let err: ApiError = RunError::MissingInput {
            field: "credentials",
        }
        .into();
        assert_eq!(err.code(), "MISSING_INPUT");
        assert!(err.to_string().contains("INPUT_CHECK"));

        let err: ApiError = RunError::from(ValidationError::new("spindle_count", "必须大于 0")).into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("spindle_count"));

        let err: ApiError = RunError::Generation {
            scope: "YIELD".to_string(),
            source: GenerationError::Auth("bad key".to_string()),
        }
        .into();
        assert_eq!(err.code(), "AUTH_ERROR");
        assert!(err.to_string().contains("GENERATION"));
    }

    #[test]
    fn test_repository_error_mapping() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "Report".to_string(),
            id: "r1".to_string(),
        }
        .into();
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("r1"));
    }
}
