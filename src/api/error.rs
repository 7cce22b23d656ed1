// ==========================================
// 设备维护排程系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/校验错误为用户友好的错误消息
// 红线: 错误信息必须包含显式原因（出错的类别、日期、ID）
// ==========================================

use crate::domain::error::ValidationError;
use crate::engine::orchestrator::OrchestratorError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与业务规则错误
    // ==========================================
    /// 周期集合、日期窗口、月份等校验失败
    #[error("校验失败: {0}")]
    Validation(ValidationError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储失败: {0}")]
    StorageError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 ValidationError 转换
// 未知类别按资源未找到处理，其余保持为校验错误
// ==========================================
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownCategory { ref category } => {
                ApiError::NotFound(format!("维护类别(id={})不存在", category))
            }
            other => ApiError::Validation(other),
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
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::StorageError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::DatabaseTransactionError(msg) | RepositoryError::DatabaseQueryError(msg) => {
                ApiError::StorageError(msg)
            }
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Validation(e) => e.into(),
            OrchestratorError::Repository(e) => e.into(),
        }
    }
}

// ConfigManager 返回 Box<dyn Error>
impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_surfaces_as_not_found() {
        let err: ApiError = ValidationError::UnknownCategory {
            category: "calibration".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("calibration")));
    }

    #[test]
    fn test_other_validation_errors_kept() {
        let err: ApiError = ValidationError::NonPositivePeriodicity {
            category: "routine".to_string(),
            days: 0,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::NonPositivePeriodicity { days: 0, .. })
        ));
    }

    #[test]
    fn test_repository_errors_mapped() {
        let err: ApiError = RepositoryError::not_found("Equipment", "eq-404").into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("eq-404")));

        let err: ApiError = RepositoryError::UniqueConstraintViolation("slug".to_string()).into();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err: ApiError = RepositoryError::DatabaseQueryError("disk I/O error".to_string()).into();
        assert!(matches!(err, ApiError::StorageError(_)));
    }
}
