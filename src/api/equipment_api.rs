// ==========================================
// 设备维护排程系统 - 设备管理 API
// ==========================================
// 职责: 设备登记、周期设置、可见设备查询、删除
// 红线: 周期集合校验通过前不写入任何数据
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::equipment::{Equipment, NewEquipment};
use crate::domain::error::ValidationError;
use crate::domain::periodicity::{PeriodicityInput, PeriodicitySet};
use crate::domain::reconcile::ReconcileOutcome;
use crate::domain::schedule_window::ScheduleWindow;
use crate::engine::orchestrator::MaintenanceOrchestrator;
use crate::engine::periodicity_validator::PeriodicityValidator;
use crate::repository::category_repo::MaintenanceCategoryRepository;
use crate::repository::equipment_repo::{EquipmentRepository, EquipmentTypeRepository};
use crate::repository::maintenance_event_repo::MaintenanceEventRepository;
use crate::repository::periodicity_repo::PeriodicityRepository;

// ==========================================
// EquipmentCreated - 设备登记结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCreated {
    pub equipment: Equipment,
    pub periodicities: PeriodicitySet,
    pub outcome: ReconcileOutcome,
}

// ==========================================
// EquipmentApi - 设备管理 API
// ==========================================

/// 设备管理API
///
/// 职责：
/// 1. 登记设备并按安装日期生成默认窗口的维护计划
/// 2. 修改周期集合并重新排程
/// 3. 可见设备查询（设备可见、类型可见、已投用）
pub struct EquipmentApi {
    equipment_repo: Arc<EquipmentRepository>,
    type_repo: Arc<EquipmentTypeRepository>,
    category_repo: Arc<MaintenanceCategoryRepository>,
    periodicity_repo: Arc<PeriodicityRepository>,
    event_repo: Arc<MaintenanceEventRepository>,
    config: Arc<ConfigManager>,
    orchestrator: Arc<MaintenanceOrchestrator>,
    validator: PeriodicityValidator,
}

impl EquipmentApi {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        equipment_repo: Arc<EquipmentRepository>,
        type_repo: Arc<EquipmentTypeRepository>,
        category_repo: Arc<MaintenanceCategoryRepository>,
        periodicity_repo: Arc<PeriodicityRepository>,
        event_repo: Arc<MaintenanceEventRepository>,
        config: Arc<ConfigManager>,
        orchestrator: Arc<MaintenanceOrchestrator>,
    ) -> Self {
        Self {
            equipment_repo,
            type_repo,
            category_repo,
            periodicity_repo,
            event_repo,
            config,
            orchestrator,
            validator: PeriodicityValidator::new(),
        }
    }

    /// 登记设备
    ///
    /// # 流程
    /// 1. 校验名称、解析设备类型
    /// 2. 解析并校验周期集合（失败时不写入）
    /// 3. 设备与周期集合同事务写入
    /// 4. 生成 [安装日期, 安装日期 + 默认跨度] 的维护计划并对账
    ///
    /// 第 4 步单独成事务：若其存储失败，设备与周期集合已落库而计划为空，
    /// 对该设备调用 `ScheduleApi::generate_schedule` 即可补齐（对账幂等）
    ///
    /// # 错误
    /// - 名称为空 → InvalidInput
    /// - 类型 slug 不存在 → NotFound
    /// - 周期集合非法 → Validation / NotFound(未知类别)
    pub fn create_equipment(
        &self,
        new_equipment: NewEquipment,
        periodicities: &[PeriodicityInput],
        today: NaiveDate,
    ) -> ApiResult<EquipmentCreated> {
        let name = new_equipment.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("设备名称不能为空".to_string()));
        }

        let type_id = match new_equipment.type_slug.as_deref() {
            Some(slug) => {
                let equipment_type = self
                    .type_repo
                    .find_by_slug(slug)?
                    .ok_or_else(|| ApiError::NotFound(format!("设备类型(slug={})不存在", slug)))?;
                Some(equipment_type.type_id)
            }
            None => None,
        };

        let catalog = self.category_repo.list_all()?;
        let set = self.validator.resolve(periodicities, &catalog).map_err(|e| {
            tracing::warn!(equipment = name, error = %e, "周期集合校验失败，拒绝登记");
            ApiError::from(e)
        })?;

        let window = ScheduleWindow::with_horizon(
            new_equipment.installation_date,
            self.config.default_horizon_days()?,
        )?;
        self.check_horizon(&window, today)?;

        let now = Local::now().naive_local();
        let equipment = Equipment {
            equipment_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            model: new_equipment.model.trim().to_string(),
            description: new_equipment.description.filter(|d| !d.trim().is_empty()),
            type_id,
            installation_date: new_equipment.installation_date,
            is_displayed: new_equipment.is_displayed,
            created_at: now.with_nanosecond(0).unwrap_or(now),
        };
        self.equipment_repo
            .insert_with_periodicities(&equipment, &set)?;

        tracing::info!(
            equipment_id = %equipment.equipment_id,
            name = %equipment.name,
            installation_date = %equipment.installation_date,
            "设备已登记"
        );

        let result = self
            .orchestrator
            .regenerate(
                &equipment.equipment_id,
                &set,
                &catalog,
                &window,
                self.config.max_horizon_days()?,
                today,
            )
            .map_err(|e| {
                tracing::warn!(
                    equipment_id = %equipment.equipment_id,
                    error = %e,
                    "设备已登记，维护计划生成失败，可通过 generate_schedule 重试"
                );
                ApiError::from(e)
            })?;

        Ok(EquipmentCreated {
            equipment,
            periodicities: set,
            outcome: result.outcome,
        })
    }

    /// 修改设备周期集合并重新排程
    ///
    /// 重新排程窗口: [安装日期, max(安装日期 + 默认跨度, 已有最晚计划日期)]，
    /// 保证此前生成到更远日期的计划也按新周期对账
    ///
    /// 新集合先落库、再单独对账：若对账存储失败，计划仍按旧集合，
    /// 重试本操作或调用 `ScheduleApi::generate_schedule` 即可收敛
    ///
    /// # 错误
    /// - 设备不存在 → NotFound
    /// - 周期集合非法 → Validation / NotFound(未知类别)，原集合保持不变
    pub fn update_periodicities(
        &self,
        equipment_id: &str,
        periodicities: &[PeriodicityInput],
        today: NaiveDate,
    ) -> ApiResult<ReconcileOutcome> {
        let equipment = self.get_equipment(equipment_id)?;

        let catalog = self.category_repo.list_all()?;
        let set = self.validator.resolve(periodicities, &catalog).map_err(|e| {
            tracing::warn!(equipment_id, error = %e, "周期集合校验失败，保持原集合");
            ApiError::from(e)
        })?;

        let default_window = ScheduleWindow::with_horizon(
            equipment.installation_date,
            self.config.default_horizon_days()?,
        )?;
        let window = match self.event_repo.latest_planned_date(equipment_id)? {
            Some(latest) if latest > default_window.end() => {
                ScheduleWindow::new(equipment.installation_date, latest)?
            }
            _ => default_window,
        };
        self.check_horizon(&window, today)?;

        self.periodicity_repo.replace_for_equipment(equipment_id, &set)?;
        tracing::info!(equipment_id, categories = set.len(), "设备周期集合已更新");

        let result = self
            .orchestrator
            .regenerate(
                equipment_id,
                &set,
                &catalog,
                &window,
                self.config.max_horizon_days()?,
                today,
            )
            .map_err(|e| {
                tracing::warn!(equipment_id, error = %e, "新周期集合已保存，重新排程失败，可重试");
                ApiError::from(e)
            })?;
        Ok(result.outcome)
    }

    /// 查询设备
    ///
    /// # 错误
    /// - 设备不存在 → NotFound
    pub fn get_equipment(&self, equipment_id: &str) -> ApiResult<Equipment> {
        self.equipment_repo
            .find_by_id(equipment_id)?
            .ok_or_else(|| ApiError::NotFound(format!("设备(id={})不存在", equipment_id)))
    }

    /// 查询设备当前的周期集合
    pub fn get_periodicities(&self, equipment_id: &str) -> ApiResult<PeriodicitySet> {
        self.get_equipment(equipment_id)?;
        Ok(self.periodicity_repo.find_by_equipment(equipment_id)?)
    }

    /// 查询可见设备
    ///
    /// 条件: 设备可见、已分类且类型可见、安装日期不晚于 today；未分类设备不列出
    pub fn list_visible_equipment(&self, today: NaiveDate) -> ApiResult<Vec<Equipment>> {
        Ok(self.equipment_repo.list_visible(today)?)
    }

    /// 查询指定类型下的可见设备
    ///
    /// # 错误
    /// - 类型不存在或已隐藏 → NotFound
    pub fn list_visible_by_type(&self, slug: &str, today: NaiveDate) -> ApiResult<Vec<Equipment>> {
        let equipment_type = self
            .type_repo
            .find_by_slug(slug)?
            .filter(|t| t.is_displayed)
            .ok_or_else(|| ApiError::NotFound(format!("设备类型(slug={})不存在", slug)))?;

        Ok(self
            .equipment_repo
            .list_visible_by_type(&equipment_type.type_id, today)?)
    }

    /// 删除设备（周期集合与维护事件级联删除）
    ///
    /// # 错误
    /// - 设备不存在 → NotFound
    pub fn delete_equipment(&self, equipment_id: &str) -> ApiResult<()> {
        self.equipment_repo.delete(equipment_id)?;
        tracing::info!(equipment_id, "设备已删除");
        Ok(())
    }

    /// 写入前预检跨度上限（只计 today 之后的部分，与生成引擎一致）
    fn check_horizon(&self, window: &ScheduleWindow, today: NaiveDate) -> ApiResult<()> {
        let max_days = self.config.max_horizon_days()?;
        let days = window.forward_span_days(today);
        if days > max_days {
            return Err(ValidationError::HorizonTooLong { days, max_days }.into());
        }
        Ok(())
    }
}
