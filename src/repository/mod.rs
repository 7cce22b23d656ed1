// ==========================================
// 设备维护排程系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod category_repo;
pub mod equipment_repo;
pub mod error;
pub mod maintenance_event_repo;
pub mod periodicity_repo;

// 重导出核心仓储
pub use category_repo::MaintenanceCategoryRepository;
pub use equipment_repo::{EquipmentRepository, EquipmentTypeRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use maintenance_event_repo::MaintenanceEventRepository;
pub use periodicity_repo::PeriodicityRepository;
