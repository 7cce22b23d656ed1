// ==========================================
// 设备维护排程系统 - 逾期状态判定引擎
// ==========================================
// 红线: 唯一的自动状态迁移是 scheduled → overdue
// 红线: completed / overdue 不会被自动回退
// ==========================================
// 职责: 依据参考日期（通常为今天）刷新逾期状态
// 说明: 幂等，读取排程视图前可随时调用
// ==========================================

use crate::domain::maintenance_event::MaintenanceEvent;
use crate::domain::types::MaintenanceStatus;
use crate::repository::error::RepositoryResult;
use crate::repository::maintenance_event_repo::MaintenanceEventRepository;
use chrono::NaiveDate;
use std::sync::Arc;

/// 单个事件在 today 时是否应判为逾期
pub fn is_overdue(event: &MaintenanceEvent, today: NaiveDate) -> bool {
    !event.status.is_settled() && event.planned_date < today
}

/// 内存中刷新逾期状态
///
/// # 返回
/// 被改为 overdue 的事件数
pub fn resolve_in_place(events: &mut [MaintenanceEvent], today: NaiveDate) -> usize {
    let mut updated = 0;
    for event in events.iter_mut().filter(|e| is_overdue(e, today)) {
        event.status = MaintenanceStatus::Overdue;
        updated += 1;
    }
    updated
}

// ==========================================
// StatusResolver - 逾期状态判定引擎
// ==========================================
pub struct StatusResolver {
    event_repo: Arc<MaintenanceEventRepository>,
}

impl StatusResolver {
    pub fn new(event_repo: Arc<MaintenanceEventRepository>) -> Self {
        Self { event_repo }
    }

    /// 刷新全部设备的逾期状态
    ///
    /// # 参数
    /// - today: 参考日期，planned_date < today 的 scheduled 事件转为 overdue
    ///
    /// # 返回
    /// 本次更新的事件数（重复调用返回 0）
    pub fn resolve_overdue(&self, today: NaiveDate) -> RepositoryResult<usize> {
        let updated = self.event_repo.mark_overdue_before(today, None)?;
        if updated > 0 {
            tracing::info!(%today, updated, "维护事件逾期状态已刷新");
        }
        Ok(updated)
    }

    /// 刷新单台设备的逾期状态
    pub fn resolve_overdue_for_equipment(
        &self,
        equipment_id: &str,
        today: NaiveDate,
    ) -> RepositoryResult<usize> {
        let updated = self.event_repo.mark_overdue_before(today, Some(equipment_id))?;
        if updated > 0 {
            tracing::info!(equipment_id, %today, updated, "设备维护事件逾期状态已刷新");
        }
        Ok(updated)
    }
}
