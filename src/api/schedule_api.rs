// ==========================================
// 设备维护排程系统 - 维护计划 API
// ==========================================
// 职责: 生成计划、刷新逾期、月历视图、人工录入结果
// 红线: 结束日期必须晚于 today 才允许生成
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::calendar::{CalendarMonth, MonthCursor};
use crate::domain::error::ValidationError;
use crate::domain::maintenance_event::{MaintenanceEvent, MaintenanceEventUpdate};
use crate::domain::reconcile::ReconcileOutcome;
use crate::domain::schedule_window::ScheduleWindow;
use crate::engine::calendar_projector;
use crate::engine::orchestrator::MaintenanceOrchestrator;
use crate::engine::status_resolver::StatusResolver;
use crate::i18n;
use crate::repository::category_repo::MaintenanceCategoryRepository;
use crate::repository::equipment_repo::EquipmentRepository;
use crate::repository::maintenance_event_repo::MaintenanceEventRepository;
use crate::repository::periodicity_repo::PeriodicityRepository;

// ==========================================
// EventLabel - 事件显示文本（按当前语言）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLabel {
    pub event_id: String,
    pub category: String,
    pub status: String,
}

// ==========================================
// MonthView - 月历视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub calendar: CalendarMonth,
    pub events: Vec<MaintenanceEvent>, // 当月事件，按日期排序
    pub labels: Vec<EventLabel>,       // 与 events 一一对应
    pub previous: MonthCursor,
    pub next: MonthCursor,
}

// ==========================================
// ScheduleApi - 维护计划 API
// ==========================================
pub struct ScheduleApi {
    equipment_repo: Arc<EquipmentRepository>,
    category_repo: Arc<MaintenanceCategoryRepository>,
    periodicity_repo: Arc<PeriodicityRepository>,
    event_repo: Arc<MaintenanceEventRepository>,
    config: Arc<ConfigManager>,
    orchestrator: Arc<MaintenanceOrchestrator>,
    status_resolver: Arc<StatusResolver>,
}

impl ScheduleApi {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        equipment_repo: Arc<EquipmentRepository>,
        category_repo: Arc<MaintenanceCategoryRepository>,
        periodicity_repo: Arc<PeriodicityRepository>,
        event_repo: Arc<MaintenanceEventRepository>,
        config: Arc<ConfigManager>,
        orchestrator: Arc<MaintenanceOrchestrator>,
        status_resolver: Arc<StatusResolver>,
    ) -> Self {
        Self {
            equipment_repo,
            category_repo,
            periodicity_repo,
            event_repo,
            config,
            orchestrator,
            status_resolver,
        }
    }

    /// 生成维护计划至 end_date
    ///
    /// 窗口为 [安装日期, end_date]；窗口内人工录入过的事件保留
    ///
    /// # 错误
    /// - end_date 不晚于 today → InvalidDateRange
    /// - 设备不存在 → NotFound
    /// - end_date 不晚于安装日期 → InvalidDateRange
    /// - 跨度超过上限 → HorizonTooLong
    pub fn generate_schedule(
        &self,
        equipment_id: &str,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> ApiResult<ReconcileOutcome> {
        if end_date <= today {
            tracing::warn!(equipment_id, %end_date, %today, "结束日期必须晚于今天");
            return Err(ValidationError::InvalidDateRange {
                start: today,
                end: end_date,
            }
            .into());
        }

        let equipment = self
            .equipment_repo
            .find_by_id(equipment_id)?
            .ok_or_else(|| ApiError::NotFound(format!("设备(id={})不存在", equipment_id)))?;

        let window = ScheduleWindow::new(equipment.installation_date, end_date)?;
        let set = self.periodicity_repo.find_by_equipment(equipment_id)?;
        let catalog = self.category_repo.list_all()?;

        let result = self.orchestrator.regenerate(
            equipment_id,
            &set,
            &catalog,
            &window,
            self.config.max_horizon_days()?,
            today,
        )?;
        Ok(result.outcome)
    }

    /// 刷新全部设备的逾期状态
    pub fn resolve_overdue(&self, today: NaiveDate) -> ApiResult<usize> {
        Ok(self.status_resolver.resolve_overdue(today)?)
    }

    /// 单台设备的月历视图
    ///
    /// # 错误
    /// - 设备不存在 → NotFound
    /// - 月份非法 → InvalidMonth
    pub fn equipment_month(
        &self,
        equipment_id: &str,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> ApiResult<MonthView> {
        let cursor = MonthCursor::new(year, month)?;
        if self.equipment_repo.find_by_id(equipment_id)?.is_none() {
            return Err(ApiError::NotFound(format!("设备(id={})不存在", equipment_id)));
        }

        if self.config.resolve_overdue_on_read()? {
            self.status_resolver
                .resolve_overdue_for_equipment(equipment_id, today)?;
        }

        let (first, last) = cursor.bounds();
        let events = self.event_repo.find_in_window(equipment_id, first, last)?;
        self.build_view(cursor, events, today)
    }

    /// 全部设备的月历视图
    pub fn fleet_month(&self, year: i32, month: u32, today: NaiveDate) -> ApiResult<MonthView> {
        let cursor = MonthCursor::new(year, month)?;

        if self.config.resolve_overdue_on_read()? {
            self.status_resolver.resolve_overdue(today)?;
        }

        let (first, last) = cursor.bounds();
        let events = self.event_repo.find_in_range(first, last)?;
        self.build_view(cursor, events, today)
    }

    /// 人工录入维护结果
    ///
    /// # 错误
    /// - 事件不存在 → NotFound
    pub fn update_event(
        &self,
        event_id: &str,
        update: MaintenanceEventUpdate,
    ) -> ApiResult<MaintenanceEvent> {
        self.event_repo.update_result(event_id, &update)?;

        tracing::info!(
            event_id,
            status = %update.status,
            actual_date = ?update.actual_date,
            "维护事件结果已录入"
        );

        self.event_repo
            .find_by_id(event_id)?
            .ok_or_else(|| ApiError::NotFound(format!("维护事件(id={})不存在", event_id)))
    }

    /// 查询设备在窗口内的事件
    pub fn list_events(
        &self,
        equipment_id: &str,
        window: &ScheduleWindow,
    ) -> ApiResult<Vec<MaintenanceEvent>> {
        if self.equipment_repo.find_by_id(equipment_id)?.is_none() {
            return Err(ApiError::NotFound(format!("设备(id={})不存在", equipment_id)));
        }
        Ok(self
            .event_repo
            .find_in_window(equipment_id, window.start(), window.end())?)
    }

    fn build_view(
        &self,
        cursor: MonthCursor,
        events: Vec<MaintenanceEvent>,
        today: NaiveDate,
    ) -> ApiResult<MonthView> {
        let calendar = calendar_projector::project_with(
            cursor.year,
            cursor.month,
            &events,
            today,
            self.config.week_start()?,
        )?;

        let names: HashMap<String, String> = self
            .category_repo
            .list_all()?
            .into_iter()
            .map(|c| (c.category_id, c.name))
            .collect();
        let labels = events
            .iter()
            .map(|e| EventLabel {
                event_id: e.event_id.clone(),
                category: i18n::category_label(
                    &e.category_id,
                    names.get(&e.category_id).map_or(e.category_id.as_str(), String::as_str),
                ),
                status: i18n::status_label(e.status),
            })
            .collect();

        Ok(MonthView {
            calendar,
            events,
            labels,
            previous: cursor.previous(),
            next: cursor.next(),
        })
    }
}
