// ==========================================
// 设备维护排程系统 - 月历视图模型
// ==========================================
// 只描述数据结构，不含任何渲染逻辑
// ==========================================

use crate::domain::error::ValidationError;
use crate::domain::maintenance_event::MaintenanceEvent;
use crate::domain::types::WeekStart;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DayCell - 日格
// ==========================================
// day 为 None 表示月初/月末的占位格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub day: Option<u32>,
    pub events: Vec<MaintenanceEvent>,
    pub is_today: bool,
    pub is_weekend: bool,
}

impl DayCell {
    pub fn placeholder() -> Self {
        Self {
            day: None,
            events: Vec::new(),
            is_today: false,
            is_weekend: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.day.is_none()
    }
}

// ==========================================
// CalendarWeek - 周行（固定 7 格）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: Vec<DayCell>,
}

// ==========================================
// CalendarMonth - 月历
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub week_start: WeekStart,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarMonth {
    /// 非占位日格数（等于当月天数）
    pub fn day_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter(|c| !c.is_placeholder())
            .count()
    }
}

// ==========================================
// MonthCursor - 年月游标（月份导航）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    /// 构造游标
    ///
    /// # 错误
    /// - month 不在 1..=12，或年份超出日期可表示范围 → InvalidMonth
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// 当月第一天
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 当月天数
    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match NaiveDate::from_ymd_opt(next.year, next.month, 1) {
            Some(next_first) => (next_first - self.first_day()).num_days() as u32,
            None => 31, // 只有 12 月会落到这里（下一年超出范围）
        }
    }

    /// 当月首尾日期 [first, last]
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let first = self.first_day();
        let last = NaiveDate::from_ymd_opt(self.year, self.month, self.days_in_month()).unwrap_or(first);
        (first, last)
    }
}
