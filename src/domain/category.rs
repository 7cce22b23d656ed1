// ==========================================
// 设备维护排程系统 - 维护类别领域模型
// ==========================================
// 类别为全局目录，通过稳定 ID 引用
// 依赖关系用层级 (tier) 表达，不按类别名称做判断
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceCategory - 维护类别
// ==========================================
// 对齐: maintenance_category 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceCategory {
    pub category_id: String,                 // 稳定标识 (如 routine)
    pub name: String,                        // 显示名称
    pub tier: u32,                           // 层级，0 为最低层
    pub base_periodicity_days: Option<i64>,  // 默认周期（天），设备可覆写
}

impl MaintenanceCategory {
    pub fn new(
        category_id: impl Into<String>,
        name: impl Into<String>,
        tier: u32,
        base_periodicity_days: Option<i64>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            name: name.into(),
            tier,
            base_periodicity_days,
        }
    }
}

/// 例行检查
pub const ROUTINE: &str = "routine";
/// 维修
pub const REPAIR: &str = "repair";
/// 大修
pub const OVERHAUL: &str = "overhaul";

/// 默认类别目录（建库时写入）
///
/// 大修依赖维修，维修依赖例行检查
pub fn default_catalog() -> Vec<MaintenanceCategory> {
    vec![
        MaintenanceCategory::new(ROUTINE, "Routine inspection", 0, None),
        MaintenanceCategory::new(REPAIR, "Repair", 1, None),
        MaintenanceCategory::new(OVERHAUL, "Overhaul", 2, None),
    ]
}
