// ==========================================
// 设备维护排程系统 - 校验错误类型
// ==========================================
// 红线: 校验在任何写入之前完成，失败时不产生部分状态
// 红线: 错误信息必须指明具体的类别、周期、日期
// 工具: thiserror 派生宏
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // ===== 周期集合 =====
    #[error("周期不互为整数倍: {first_category}={first_days}天, {second_category}={second_days}天")]
    IncompatiblePeriodicities {
        first_category: String,
        first_days: i64,
        second_category: String,
        second_days: i64,
    },

    #[error("缺少前置周期: {category} 需要先设置 {prerequisite} 的周期")]
    MissingPrerequisitePeriodicity {
        category: String,
        prerequisite: String,
    },

    #[error("周期必须为正整数: {category}={days}天")]
    NonPositivePeriodicity { category: String, days: i64 },

    #[error("未设置周期且类别无默认周期: {category}")]
    UndefinedPeriodicity { category: String },

    #[error("维护类别不存在: {category}")]
    UnknownCategory { category: String },

    // ===== 日期范围 =====
    #[error("无效的日期范围: start={start}, end={end}（结束日期必须晚于开始日期）")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("排程跨度过长: {days}天 > 上限{max_days}天")]
    HorizonTooLong { days: i64, max_days: i64 },

    #[error("无效的年月: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
