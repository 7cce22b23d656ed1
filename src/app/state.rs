// ==========================================
// 设备维护排程系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{CatalogApi, EquipmentApi, ScheduleApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{MaintenanceOrchestrator, ScheduleReconciler, StatusResolver};
use crate::repository::{
    category_repo::MaintenanceCategoryRepository,
    equipment_repo::{EquipmentRepository, EquipmentTypeRepository},
    maintenance_event_repo::MaintenanceEventRepository,
    periodicity_repo::PeriodicityRepository,
};

/// 默认数据库文件名
const DB_FILE_NAME: &str = "equipment_maintenance.db";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 目录管理API
    pub catalog_api: Arc<CatalogApi>,

    /// 设备管理API
    pub equipment_api: Arc<EquipmentApi>,

    /// 维护计划API
    pub schedule_api: Arc<ScheduleApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化 schema（幂等）
    /// 2. 初始化所有Repository与Engine（共享同一连接）
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let equipment_repo = Arc::new(EquipmentRepository::new(conn.clone()));
        let type_repo = Arc::new(EquipmentTypeRepository::new(conn.clone()));
        let category_repo = Arc::new(MaintenanceCategoryRepository::new(conn.clone()));
        let periodicity_repo = Arc::new(PeriodicityRepository::new(conn.clone()));
        let event_repo = Arc::new(MaintenanceEventRepository::new(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let reconciler = Arc::new(ScheduleReconciler::new(event_repo.clone()));
        let status_resolver = Arc::new(StatusResolver::new(event_repo.clone()));
        let orchestrator = Arc::new(MaintenanceOrchestrator::new(
            reconciler,
            status_resolver.clone(),
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let catalog_api = Arc::new(CatalogApi::new(category_repo.clone(), type_repo.clone()));

        let equipment_api = Arc::new(EquipmentApi::new(
            equipment_repo.clone(),
            type_repo,
            category_repo.clone(),
            periodicity_repo.clone(),
            event_repo.clone(),
            config_manager.clone(),
            orchestrator.clone(),
        ));

        let schedule_api = Arc::new(ScheduleApi::new(
            equipment_repo,
            category_repo,
            periodicity_repo,
            event_repo,
            config_manager.clone(),
            orchestrator,
            status_resolver,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            catalog_api,
            equipment_api,
            schedule_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 MAINTENANCE_DB_PATH
/// 2. 用户数据目录下的 equipment-maintenance/equipment_maintenance.db
/// 3. 当前目录下的 equipment_maintenance.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("MAINTENANCE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("equipment-maintenance-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("equipment-maintenance");

        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
