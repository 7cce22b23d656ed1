// ==========================================
// 设备维护排程系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 维护状态 (Maintenance Status)
// ==========================================
// 自动迁移只有一条: Scheduled → Overdue
// Completed 只能由人工设置
// 序列化格式: lowercase (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Scheduled, // 已计划
    Completed, // 已完成
    Overdue,   // 已逾期
}

impl MaintenanceStatus {
    /// 数据库存储值
    pub fn as_db_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Overdue => "overdue",
        }
    }

    /// 从数据库值解析
    ///
    /// 未知值返回 None，由调用方决定如何报错
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Some(MaintenanceStatus::Scheduled),
            "completed" => Some(MaintenanceStatus::Completed),
            "overdue" => Some(MaintenanceStatus::Overdue),
            _ => None,
        }
    }

    /// 是否为终态（自动迁移不再改变）
    pub fn is_settled(&self) -> bool {
        !matches!(self, MaintenanceStatus::Scheduled)
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 日历周起始日 (Week Start)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn from_config_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(WeekStart::Monday),
            "sunday" | "sun" => Some(WeekStart::Sunday),
            _ => None,
        }
    }

    pub fn as_config_str(&self) -> &'static str {
        match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        }
    }
}
