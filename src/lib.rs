// ==========================================
// 设备维护排程系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 预防性维护计划（人工录入最终结果）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MaintenanceStatus, WeekStart};

// 领域实体
pub use domain::{
    CalendarMonth, CandidateEvent, Equipment, EquipmentType, MaintenanceCategory,
    MaintenanceEvent, MaintenanceEventUpdate, MonthCursor, NewEquipment, PeriodicityInput,
    PeriodicitySet, ReconcileOutcome, ScheduleWindow, ValidationError,
};

// 引擎
pub use engine::{
    MaintenanceOrchestrator, PeriodicityValidator, ScheduleGenerator, ScheduleReconciler,
    StatusResolver,
};

// API
pub use api::{ApiError, CatalogApi, EquipmentApi, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备维护排程系统";
