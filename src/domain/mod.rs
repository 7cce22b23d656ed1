// ==========================================
// 设备维护排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值对象、校验错误
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod category;
pub mod equipment;
pub mod error;
pub mod maintenance_event;
pub mod periodicity;
pub mod reconcile;
pub mod schedule_window;
pub mod types;

// 重导出核心类型
pub use calendar::{CalendarMonth, CalendarWeek, DayCell, MonthCursor};
pub use category::MaintenanceCategory;
pub use equipment::{Equipment, EquipmentType, NewEquipment};
pub use error::{ValidationError, ValidationResult};
pub use maintenance_event::{CandidateEvent, MaintenanceEvent, MaintenanceEventUpdate};
pub use periodicity::{PeriodicityInput, PeriodicitySet};
pub use reconcile::{ReconcileOutcome, ReconcilePlan};
pub use schedule_window::{ScheduleWindow, DEFAULT_HORIZON_DAYS};
pub use types::{MaintenanceStatus, WeekStart};
