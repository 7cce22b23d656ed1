// ==========================================
// 设备维护排程系统 - 维护计划生成引擎
// ==========================================
// 红线: 锚点日期本身永远不作为到期日
// 红线: 同样输入得到同样输出（不读取系统时间）
// ==========================================
// 职责: 将 (类别, 周期, 锚点) 展开为 (start, end] 内的候选维护事件
// 输入: 设备ID + PeriodicitySet + 类别目录 + ScheduleWindow
// 输出: 按 (计划日期, 层级, 类别ID) 排序的候选事件
// ==========================================

use crate::domain::category::MaintenanceCategory;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::maintenance_event::CandidateEvent;
use crate::domain::periodicity::PeriodicitySet;
use crate::domain::schedule_window::ScheduleWindow;
use crate::domain::types::MaintenanceStatus;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// 默认最大排程跨度（天）
pub const DEFAULT_MAX_HORIZON_DAYS: i64 = 3650;

// ==========================================
// ScheduleGenerator - 维护计划生成引擎
// ==========================================
pub struct ScheduleGenerator {
    max_horizon_days: i64,
    reference_date: Option<NaiveDate>, // 跨度上限自此日期起算；None 时自窗口起点
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self::with_max_horizon(DEFAULT_MAX_HORIZON_DAYS)
    }

    /// 指定最大排程跨度，防止超长窗口生成无界结果集
    pub fn with_max_horizon(max_horizon_days: i64) -> Self {
        Self {
            max_horizon_days,
            reference_date: None,
        }
    }

    /// 只对参考日期之后的部分限制跨度
    ///
    /// 安装多年的设备，已过去的部分不计入上限
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    pub fn max_horizon_days(&self) -> i64 {
        self.max_horizon_days
    }

    /// 生成候选维护事件
    ///
    /// # 规则
    /// - 对周期为 p 的类别，依次产出 start + p, start + 2p, ... 直到超过 end
    /// - 结果按 (planned_date, tier, category_id) 排序
    ///
    /// # 错误
    /// - 窗口跨度（设置参考日期时只计其后部分）超过上限 → HorizonTooLong
    /// - 类别不在目录中 → UnknownCategory
    /// - 周期非正 → NonPositivePeriodicity
    pub fn generate(
        &self,
        equipment_id: &str,
        set: &PeriodicitySet,
        catalog: &[MaintenanceCategory],
        window: &ScheduleWindow,
    ) -> ValidationResult<Vec<CandidateEvent>> {
        let span = match self.reference_date {
            Some(reference) => window.forward_span_days(reference),
            None => window.span_days(),
        };
        if span > self.max_horizon_days {
            return Err(ValidationError::HorizonTooLong {
                days: span,
                max_days: self.max_horizon_days,
            });
        }

        let tiers: HashMap<&str, u32> = catalog
            .iter()
            .map(|c| (c.category_id.as_str(), c.tier))
            .collect();

        let mut candidates = Vec::new();
        for (category_id, periodicity_days) in set.iter() {
            let tier = *tiers
                .get(category_id)
                .ok_or_else(|| ValidationError::UnknownCategory {
                    category: category_id.to_string(),
                })?;

            if periodicity_days <= 0 {
                return Err(ValidationError::NonPositivePeriodicity {
                    category: category_id.to_string(),
                    days: periodicity_days,
                });
            }

            let step = Duration::days(periodicity_days);
            let mut current = window.start();
            while let Some(next) = current.checked_add_signed(step) {
                if next > window.end() {
                    break;
                }
                candidates.push(CandidateEvent {
                    equipment_id: equipment_id.to_string(),
                    category_id: category_id.to_string(),
                    tier,
                    planned_date: next,
                    status: MaintenanceStatus::Scheduled,
                });
                current = next;
            }
        }

        candidates.sort_by(|a, b| {
            a.planned_date
                .cmp(&b.planned_date)
                .then_with(|| a.tier.cmp(&b.tier))
                .then_with(|| a.category_id.cmp(&b.category_id))
        });

        tracing::debug!(
            equipment_id,
            start = %window.start(),
            end = %window.end(),
            categories = set.len(),
            candidates = candidates.len(),
            "生成候选维护事件"
        );

        Ok(candidates)
    }
}
