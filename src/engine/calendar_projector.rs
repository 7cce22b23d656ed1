// ==========================================
// 设备维护排程系统 - 月历投影
// ==========================================
// 职责: 按日期把维护事件分组到周行×7 的月历网格
// 说明: 纯函数，不取数，不渲染
// ==========================================

use crate::domain::calendar::{CalendarMonth, CalendarWeek, DayCell, MonthCursor};
use crate::domain::error::ValidationResult;
use crate::domain::maintenance_event::MaintenanceEvent;
use crate::domain::types::WeekStart;
use chrono::{Datelike, Weekday};

const DAYS_PER_WEEK: usize = 7;

/// 周一为首日的月历投影
pub fn project(
    year: i32,
    month: u32,
    events: &[MaintenanceEvent],
    today: chrono::NaiveDate,
) -> ValidationResult<CalendarMonth> {
    project_with(year, month, events, today, WeekStart::Monday)
}

/// 月历投影
///
/// # 规则
/// - 每周固定 7 格，月初与月末不足处补占位格 (day = None)
/// - 不输出整行都是占位格的周
/// - 日格内事件保持输入顺序
/// - is_today 与传入的 today 比较，is_weekend 为周六/周日
///
/// # 错误
/// - month 不在 1..=12 → InvalidMonth
pub fn project_with(
    year: i32,
    month: u32,
    events: &[MaintenanceEvent],
    today: chrono::NaiveDate,
    week_start: WeekStart,
) -> ValidationResult<CalendarMonth> {
    let cursor = MonthCursor::new(year, month)?;
    let first_day = cursor.first_day();
    let leading = leading_placeholders(first_day.weekday(), week_start);

    let mut weeks = Vec::new();
    let mut current: Vec<DayCell> = (0..leading).map(|_| DayCell::placeholder()).collect();

    for date in first_day.iter_days().take(cursor.days_in_month() as usize) {
        let day_events: Vec<MaintenanceEvent> = events
            .iter()
            .filter(|e| e.planned_date == date)
            .cloned()
            .collect();

        current.push(DayCell {
            day: Some(date.day()),
            events: day_events,
            is_today: date == today,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        });

        if current.len() == DAYS_PER_WEEK {
            weeks.push(CalendarWeek {
                days: std::mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        current.resize_with(DAYS_PER_WEEK, DayCell::placeholder);
        weeks.push(CalendarWeek { days: current });
    }

    Ok(CalendarMonth {
        year,
        month,
        week_start,
        weeks,
    })
}

fn leading_placeholders(first_weekday: Weekday, week_start: WeekStart) -> usize {
    match week_start {
        WeekStart::Monday => first_weekday.num_days_from_monday() as usize,
        WeekStart::Sunday => first_weekday.num_days_from_sunday() as usize,
    }
}
