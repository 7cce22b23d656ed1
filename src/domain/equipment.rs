// ==========================================
// 设备维护排程系统 - 设备领域模型
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// EquipmentType - 设备类型
// ==========================================
// 对齐: equipment_type 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub type_id: String,
    pub name: String,
    pub slug: String,       // URL 友好标识，唯一
    pub is_displayed: bool, // 隐藏类型下的设备不出现在列表中
}

// ==========================================
// Equipment - 设备
// ==========================================
// 对齐: equipment 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: String,
    pub name: String,
    pub model: String,
    pub description: Option<String>,
    pub type_id: Option<String>,

    // ===== 排程锚点 =====
    pub installation_date: NaiveDate, // 维护计划从此日期起推算

    pub is_displayed: bool,
    pub created_at: NaiveDateTime,
}

impl Equipment {
    /// 设备在 today 时是否已投用
    pub fn is_installed_by(&self, today: NaiveDate) -> bool {
        self.installation_date <= today
    }
}

// ==========================================
// NewEquipment - 新建设备输入
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub model: String,
    pub description: Option<String>,
    pub type_slug: Option<String>,
    pub installation_date: NaiveDate,
    pub is_displayed: bool,
}

impl NewEquipment {
    pub fn new(name: impl Into<String>, installation_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            model: String::new(),
            description: None,
            type_slug: None,
            installation_date,
            is_displayed: true,
        }
    }

    pub fn with_type(mut self, slug: impl Into<String>) -> Self {
        self.type_slug = Some(slug.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_displayed = false;
        self
    }
}
