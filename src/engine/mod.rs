// ==========================================
// 设备维护排程系统 - 引擎层
// ==========================================
// 职责: 周期校验、计划生成、对账、逾期判定、月历投影
// 红线: Engine 不拼 SQL，数据访问一律经 Repository
// 红线: 引擎不读取系统时间，参考日期由调用方传入
// ==========================================

pub mod calendar_projector;
pub mod orchestrator;
pub mod periodicity_validator;
pub mod schedule_generator;
pub mod schedule_reconciler;
pub mod status_resolver;

// 重导出核心引擎
pub use calendar_projector::{project, project_with};
pub use orchestrator::{MaintenanceOrchestrator, OrchestratorError, RegenerateResult};
pub use periodicity_validator::PeriodicityValidator;
pub use schedule_generator::{ScheduleGenerator, DEFAULT_MAX_HORIZON_DAYS};
pub use schedule_reconciler::{plan_reconciliation, ScheduleReconciler};
pub use status_resolver::{resolve_in_place, StatusResolver};

// 校验错误定义在领域层，引擎层统一对外暴露
pub use crate::domain::error::{ValidationError, ValidationResult};
