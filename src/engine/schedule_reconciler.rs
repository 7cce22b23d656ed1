// ==========================================
// 设备维护排程系统 - 维护计划对账引擎
// ==========================================
// 红线: 已完成 / 有实际日期 / 有备注 的事件原样保留，绝不删除
// 红线: 删除与插入在同一事务内完成，不出现“删了未插”的中间态
// 红线: 相同输入重复对账，第二次无净变化（幂等）
// ==========================================
// 职责: 将候选事件合并入已落库的维护事件
// 输入: 设备ID + 候选事件 + ScheduleWindow
// 输出: ReconcileOutcome (新增/未变/保留/移除 计数)
// ==========================================

use crate::domain::maintenance_event::{CandidateEvent, MaintenanceEvent};
use crate::domain::reconcile::{ReconcileOutcome, ReconcilePlan};
use crate::domain::schedule_window::ScheduleWindow;
use crate::repository::error::RepositoryResult;
use crate::repository::maintenance_event_repo::MaintenanceEventRepository;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

/// 计算对账计划
///
/// # 规则
/// 1. 含人工录入的事件 → preserved；同键候选被丢弃
/// 2. 未编辑且同键存在候选 → unchanged（保留原行，id 与自动逾期状态不变）
/// 3. 未编辑且无同键候选，或同键重复行 → 删除
/// 4. 其余候选 → 插入
///
/// `existing` 应为同一设备、同一窗口内的事件
pub fn plan_reconciliation(
    existing: &[MaintenanceEvent],
    candidates: &[CandidateEvent],
) -> ReconcilePlan {
    let preserved_keys: HashSet<(&str, NaiveDate)> = existing
        .iter()
        .filter(|e| e.has_human_input())
        .map(|e| e.schedule_key())
        .collect();
    let candidate_keys: HashSet<(&str, NaiveDate)> =
        candidates.iter().map(|c| c.schedule_key()).collect();

    let mut plan = ReconcilePlan {
        preserved: existing.iter().filter(|e| e.has_human_input()).count(),
        ..ReconcilePlan::default()
    };

    let mut kept_keys: HashSet<(&str, NaiveDate)> = HashSet::new();
    for event in existing.iter().filter(|e| !e.has_human_input()) {
        let key = event.schedule_key();
        let matches_candidate = candidate_keys.contains(&key) && !preserved_keys.contains(&key);
        if matches_candidate && kept_keys.insert(key) {
            plan.unchanged += 1;
        } else {
            plan.to_delete.push(event.event_id.clone());
        }
    }

    let mut inserted_keys: HashSet<(&str, NaiveDate)> = HashSet::new();
    for candidate in candidates {
        let key = candidate.schedule_key();
        if preserved_keys.contains(&key) || kept_keys.contains(&key) {
            continue;
        }
        if inserted_keys.insert(key) {
            plan.to_insert.push(candidate.clone().into_event());
        }
    }

    plan
}

// ==========================================
// ScheduleReconciler - 对账引擎
// ==========================================
pub struct ScheduleReconciler {
    event_repo: Arc<MaintenanceEventRepository>,
}

impl ScheduleReconciler {
    pub fn new(event_repo: Arc<MaintenanceEventRepository>) -> Self {
        Self { event_repo }
    }

    /// 对账并落库
    ///
    /// 读取窗口内已有事件、计算计划、删除与插入均在同一事务内完成；
    /// 不属于该设备或落在窗口外的候选被忽略
    ///
    /// # 错误
    /// - 存储失败 → RepositoryError，事务回滚
    pub fn reconcile(
        &self,
        equipment_id: &str,
        candidates: &[CandidateEvent],
        window: &ScheduleWindow,
    ) -> RepositoryResult<ReconcileOutcome> {
        let scoped: Vec<CandidateEvent> = candidates
            .iter()
            .filter(|c| c.equipment_id == equipment_id && window.contains(c.planned_date))
            .cloned()
            .collect();

        if scoped.len() != candidates.len() {
            tracing::warn!(
                equipment_id,
                ignored = candidates.len() - scoped.len(),
                "忽略不属于本设备或窗口外的候选事件"
            );
        }

        let plan = self.event_repo.reconcile_window(
            equipment_id,
            window.start(),
            window.end(),
            |existing| plan_reconciliation(existing, &scoped),
        )?;

        let outcome = plan.outcome();
        tracing::info!(
            equipment_id,
            start = %window.start(),
            end = %window.end(),
            created = outcome.created,
            unchanged = outcome.unchanged,
            preserved = outcome.preserved,
            removed = outcome.removed,
            "维护计划对账完成"
        );

        Ok(outcome)
    }
}
