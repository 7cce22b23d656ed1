// ==========================================
// 设备维护排程系统 - 对账计划与结果
// ==========================================
// 对账计划由引擎计算，由仓储在单个事务内执行
// ==========================================

use crate::domain::maintenance_event::MaintenanceEvent;
use serde::{Deserialize, Serialize};

// ==========================================
// ReconcilePlan - 对账计划（纯计算结果）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_insert: Vec<MaintenanceEvent>,
    pub to_delete: Vec<String>, // event_id
    pub unchanged: usize,
    pub preserved: usize,
}

impl ReconcilePlan {
    pub fn outcome(&self) -> ReconcileOutcome {
        ReconcileOutcome {
            created: self.to_insert.len(),
            unchanged: self.unchanged,
            preserved: self.preserved,
            removed: self.to_delete.len(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

// ==========================================
// ReconcileOutcome - 对账结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub created: usize,   // 新插入的候选事件
    pub unchanged: usize, // 与候选一致、原样保留的未编辑事件
    pub preserved: usize, // 含人工录入、原样保留的事件
    pub removed: usize,   // 不再对应任何候选的未编辑事件
}
