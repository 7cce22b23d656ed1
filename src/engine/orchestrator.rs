// ==========================================
// 设备维护排程系统 - 引擎编排器
// ==========================================
// 用途: 协调 生成 → 对账 → 逾期判定 的执行顺序
// 红线: 校验失败时不触达存储
// ==========================================

use crate::domain::category::MaintenanceCategory;
use crate::domain::error::ValidationError;
use crate::domain::periodicity::PeriodicitySet;
use crate::domain::reconcile::ReconcileOutcome;
use crate::domain::schedule_window::ScheduleWindow;
use crate::engine::periodicity_validator::PeriodicityValidator;
use crate::engine::schedule_generator::ScheduleGenerator;
use crate::engine::schedule_reconciler::ScheduleReconciler;
use crate::engine::status_resolver::StatusResolver;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 编排错误：校验失败或存储失败
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ==========================================
// RegenerateResult - 重新排程结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerateResult {
    pub outcome: ReconcileOutcome,
    pub overdue_updated: usize,
}

// ==========================================
// MaintenanceOrchestrator - 引擎编排器
// ==========================================
pub struct MaintenanceOrchestrator {
    validator: PeriodicityValidator,
    reconciler: Arc<ScheduleReconciler>,
    status_resolver: Arc<StatusResolver>,
}

impl MaintenanceOrchestrator {
    pub fn new(reconciler: Arc<ScheduleReconciler>, status_resolver: Arc<StatusResolver>) -> Self {
        Self {
            validator: PeriodicityValidator::new(),
            reconciler,
            status_resolver,
        }
    }

    /// 重新生成单台设备在窗口内的维护计划
    ///
    /// # 流程
    /// 1. 校验周期集合（不含层级前置，由写入方负责）
    /// 2. 生成候选事件（跨度上限自 today 起算）
    /// 3. 对账落库（单事务）
    /// 4. 按 today 刷新该设备的逾期状态
    pub fn regenerate(
        &self,
        equipment_id: &str,
        set: &PeriodicitySet,
        catalog: &[MaintenanceCategory],
        window: &ScheduleWindow,
        max_horizon_days: i64,
        today: NaiveDate,
    ) -> Result<RegenerateResult, OrchestratorError> {
        self.validator.validate_stored(set, catalog)?;

        let candidates = ScheduleGenerator::with_max_horizon(max_horizon_days)
            .with_reference_date(today)
            .generate(equipment_id, set, catalog, window)?;

        let outcome = self.reconciler.reconcile(equipment_id, &candidates, window)?;
        let overdue_updated = self
            .status_resolver
            .resolve_overdue_for_equipment(equipment_id, today)?;

        info!(
            equipment_id,
            candidates = candidates.len(),
            created = outcome.created,
            removed = outcome.removed,
            overdue_updated,
            "维护计划重新生成完成"
        );

        Ok(RegenerateResult {
            outcome,
            overdue_updated,
        })
    }
}
