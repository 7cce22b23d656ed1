// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use equipment_maintenance::api::{CatalogApi, EquipmentApi, ScheduleApi};
use equipment_maintenance::config::config_manager::ConfigManager;
use equipment_maintenance::domain::{Equipment, NewEquipment, PeriodicityInput};
use equipment_maintenance::engine::{MaintenanceOrchestrator, ScheduleReconciler, StatusResolver};
use equipment_maintenance::repository::{
    category_repo::MaintenanceCategoryRepository,
    equipment_repo::{EquipmentRepository, EquipmentTypeRepository},
    maintenance_event_repo::MaintenanceEventRepository,
    periodicity_repo::PeriodicityRepository,
};

pub use test_helpers::d;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub catalog_api: Arc<CatalogApi>,
    pub equipment_api: Arc<EquipmentApi>,
    pub schedule_api: Arc<ScheduleApi>,

    // 用于测试数据准备与断言
    pub conn: Arc<Mutex<Connection>>,
    pub event_repo: Arc<MaintenanceEventRepository>,
    pub periodicity_repo: Arc<PeriodicityRepository>,
    pub config_manager: Arc<ConfigManager>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件
    /// - 初始化所有Repository、Engine和API（共享同一连接）
    pub fn new() -> Result<Self, String> {
        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = test_helpers::open_test_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
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
            periodicity_repo.clone(),
            event_repo.clone(),
            config_manager.clone(),
            orchestrator,
            status_resolver,
        ));

        Ok(Self {
            db_path,
            catalog_api,
            equipment_api,
            schedule_api,
            conn,
            event_repo,
            periodicity_repo,
            config_manager,
            _temp_file: temp_file,
        })
    }

    /// 登记一台设备（例行 10 天、维修 30 天）
    pub fn create_standard_equipment(&self, name: &str, installed: chrono::NaiveDate) -> Equipment {
        self.equipment_api
            .create_equipment(
                NewEquipment::new(name, installed),
                &[
                    PeriodicityInput::days("routine", 10),
                    PeriodicityInput::days("repair", 30),
                ],
                installed,
            )
            .expect("登记设备失败")
            .equipment
    }

    /// 统计某台设备的维护事件数
    pub fn count_events(&self, equipment_id: &str) -> i64 {
        let conn = self.conn.lock().expect("锁获取失败");
        test_helpers::count_events(&conn, equipment_id).expect("统计事件失败")
    }

    /// 直接执行 SQL（用于构造异常数据）
    pub fn execute(&self, sql: &str) {
        let conn = self.conn.lock().expect("锁获取失败");
        conn.execute_batch(sql).expect("执行 SQL 失败");
    }
}
