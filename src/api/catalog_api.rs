// ==========================================
// 设备维护排程系统 - 目录管理 API
// ==========================================
// 职责: 维护类别目录、设备类型的查询与管理
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::category::MaintenanceCategory;
use crate::domain::equipment::EquipmentType;
use crate::repository::category_repo::MaintenanceCategoryRepository;
use crate::repository::equipment_repo::EquipmentTypeRepository;

// ==========================================
// CatalogApi - 目录管理 API
// ==========================================

/// 目录管理API
///
/// 职责：
/// 1. 维护类别目录（层级 + 默认周期）
/// 2. 设备类型（slug + 显示开关）
pub struct CatalogApi {
    category_repo: Arc<MaintenanceCategoryRepository>,
    type_repo: Arc<EquipmentTypeRepository>,
}

impl CatalogApi {
    pub fn new(
        category_repo: Arc<MaintenanceCategoryRepository>,
        type_repo: Arc<EquipmentTypeRepository>,
    ) -> Self {
        Self {
            category_repo,
            type_repo,
        }
    }

    /// 查询全部维护类别，按层级排序
    pub fn list_categories(&self) -> ApiResult<Vec<MaintenanceCategory>> {
        Ok(self.category_repo.list_all()?)
    }

    /// 新增维护类别
    ///
    /// # 参数
    /// - code: 稳定标识（小写字母、数字、下划线、连字符）
    /// - name: 显示名称
    /// - tier: 层级，0 为最低层
    /// - base_days: 默认周期（天），可为空
    ///
    /// # 错误
    /// - 标识或名称非法、默认周期非正、标识重复 → InvalidInput
    pub fn create_category(
        &self,
        code: &str,
        name: &str,
        tier: u32,
        base_days: Option<i64>,
    ) -> ApiResult<MaintenanceCategory> {
        let code = code.trim();
        if !is_valid_identifier(code) {
            return Err(ApiError::InvalidInput(format!("类别标识非法: '{}'", code)));
        }
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("类别名称不能为空".to_string()));
        }
        if let Some(days) = base_days {
            if days <= 0 {
                return Err(ApiError::InvalidInput(format!(
                    "默认周期必须为正整数: {}={}天",
                    code, days
                )));
            }
        }
        if self.category_repo.find_by_id(code)?.is_some() {
            return Err(ApiError::InvalidInput(format!("类别标识已存在: {}", code)));
        }

        let category = MaintenanceCategory::new(code, name.trim(), tier, base_days);
        self.category_repo.insert(&category)?;

        tracing::info!(category_id = code, tier, ?base_days, "维护类别已创建");
        Ok(category)
    }

    /// 新增设备类型
    ///
    /// # 错误
    /// - 名称为空、slug 非法或重复 → InvalidInput
    pub fn create_equipment_type(&self, name: &str, slug: &str) -> ApiResult<EquipmentType> {
        let slug = slug.trim();
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备类型名称不能为空".to_string()));
        }
        if !is_valid_identifier(slug) {
            return Err(ApiError::InvalidInput(format!("设备类型 slug 非法: '{}'", slug)));
        }

        let equipment_type = EquipmentType {
            type_id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            slug: slug.to_string(),
            is_displayed: true,
        };
        self.type_repo.insert(&equipment_type)?;

        tracing::info!(slug, type_id = %equipment_type.type_id, "设备类型已创建");
        Ok(equipment_type)
    }

    /// 设置设备类型是否显示
    ///
    /// # 错误
    /// - slug 不存在 → NotFound
    pub fn set_type_displayed(&self, slug: &str, is_displayed: bool) -> ApiResult<()> {
        self.type_repo.set_displayed(slug.trim(), is_displayed)?;
        tracing::info!(slug, is_displayed, "设备类型显示状态已更新");
        Ok(())
    }

    /// 查询全部设备类型（含隐藏）
    pub fn list_equipment_types(&self) -> ApiResult<Vec<EquipmentType>> {
        Ok(self.type_repo.list_all()?)
    }
}

/// 标识仅允许小写字母、数字、下划线、连字符
fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("routine"));
        assert!(is_valid_identifier("hydraulic-press_2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("Routine"));
        assert!(!is_valid_identifier("has space"));
    }
}
