// ==========================================
// 设备维护排程系统 - 维护事件领域模型
// ==========================================
// 红线: 已完成 / 有实际日期 / 有备注 的事件不会被自动删除
// ==========================================

use crate::domain::types::MaintenanceStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceEvent - 维护事件
// ==========================================
// 对齐: maintenance_event 表
// 唯一键: (equipment_id, category_id, planned_date)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub event_id: String,
    pub equipment_id: String,
    pub category_id: String,
    pub planned_date: NaiveDate,

    // ===== 人工录入 =====
    pub actual_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub notes: String,
}

impl MaintenanceEvent {
    /// 是否包含人工录入的结果
    ///
    /// 备注只要非空即视为人工录入（包括只有空白字符的备注）
    pub fn has_human_input(&self) -> bool {
        self.actual_date.is_some()
            || !self.notes.is_empty()
            || self.status == MaintenanceStatus::Completed
    }

    /// 对账键 (category_id, planned_date)，设备维度由调用方限定
    pub fn schedule_key(&self) -> (&str, NaiveDate) {
        (self.category_id.as_str(), self.planned_date)
    }
}

// ==========================================
// CandidateEvent - 生成器输出的候选事件
// ==========================================
// 尚未落库，没有 event_id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub equipment_id: String,
    pub category_id: String,
    pub tier: u32,
    pub planned_date: NaiveDate,
    pub status: MaintenanceStatus,
}

impl CandidateEvent {
    pub fn schedule_key(&self) -> (&str, NaiveDate) {
        (self.category_id.as_str(), self.planned_date)
    }

    /// 分配 ID，转换为待插入的维护事件
    pub fn into_event(self) -> MaintenanceEvent {
        MaintenanceEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            equipment_id: self.equipment_id,
            category_id: self.category_id,
            planned_date: self.planned_date,
            actual_date: None,
            status: self.status,
            notes: String::new(),
        }
    }
}

// ==========================================
// MaintenanceEventUpdate - 人工录入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceEventUpdate {
    pub actual_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub notes: String,
}

impl MaintenanceEventUpdate {
    /// 标记完成
    pub fn completed(actual_date: NaiveDate, notes: impl Into<String>) -> Self {
        Self {
            actual_date: Some(actual_date),
            status: MaintenanceStatus::Completed,
            notes: notes.into(),
        }
    }
}
