// ==========================================
// 设备维护排程系统 - 排程时间窗口
// ==========================================
// 约束: end > start，均为日历日期
// 生成区间 (start, end]，对账区间 [start, end]
// ==========================================

use crate::domain::error::ValidationError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 默认排程跨度（天）
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ScheduleWindow {
    /// 构造窗口
    ///
    /// # 错误
    /// - end <= start → InvalidDateRange
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 按跨度构造窗口: [start, start + horizon_days]
    pub fn with_horizon(start: NaiveDate, horizon_days: i64) -> Result<Self, ValidationError> {
        let end = start
            .checked_add_signed(Duration::days(horizon_days))
            .unwrap_or(start);
        Self::new(start, end)
    }

    /// 按默认跨度（365 天）构造窗口
    pub fn with_default_horizon(start: NaiveDate) -> Result<Self, ValidationError> {
        Self::with_horizon(start, DEFAULT_HORIZON_DAYS)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 窗口跨度（天）
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// 自参考日期起向前的跨度（天）
    ///
    /// 起点取 max(start, reference)；参考日期晚于 end 时为 0
    pub fn forward_span_days(&self, reference: NaiveDate) -> i64 {
        let from = self.start.max(reference);
        (self.end - from).num_days().max(0)
    }

    /// 闭区间包含判断 [start, end]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted_range() {
        assert!(matches!(
            ScheduleWindow::new(d(2024, 1, 1), d(2024, 1, 1)),
            Err(ValidationError::InvalidDateRange { .. })
        ));
        assert!(ScheduleWindow::new(d(2024, 2, 1), d(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_default_horizon() {
        let window = ScheduleWindow::with_default_horizon(d(2024, 1, 1)).unwrap();
        assert_eq!(window.end(), d(2024, 12, 31)); // 2024 为闰年
        assert_eq!(window.span_days(), 365);
    }

    #[test]
    fn test_non_positive_horizon_is_invalid() {
        assert!(ScheduleWindow::with_horizon(d(2024, 1, 1), 0).is_err());
        assert!(ScheduleWindow::with_horizon(d(2024, 1, 1), -5).is_err());
    }

    #[test]
    fn test_overflowing_horizon_is_invalid() {
        assert!(matches!(
            ScheduleWindow::with_horizon(d(2024, 1, 1), 1_000_000_000),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_forward_span_ignores_elapsed_part() {
        let window = ScheduleWindow::new(d(2014, 1, 1), d(2027, 1, 1)).unwrap();
        assert!(window.span_days() > 4000);
        assert_eq!(window.forward_span_days(d(2026, 10, 19)), 74);
        // 参考日期早于起点时按整个窗口计
        assert_eq!(window.forward_span_days(d(2010, 1, 1)), window.span_days());
        assert_eq!(window.forward_span_days(d(2030, 1, 1)), 0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = ScheduleWindow::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert!(window.contains(d(2024, 1, 1)));
        assert!(window.contains(d(2024, 1, 31)));
        assert!(!window.contains(d(2024, 2, 1)));
    }
}
