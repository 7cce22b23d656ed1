// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取、默认值回退与写入
// ==========================================

mod test_helpers;

use equipment_maintenance::config::{config_keys, ConfigManager};
use equipment_maintenance::domain::WeekStart;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_defaults_when_unset() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config_manager.default_horizon_days().unwrap(), 365);
    assert_eq!(config_manager.max_horizon_days().unwrap(), 3650);
    assert!(config_manager.resolve_overdue_on_read().unwrap());
    assert_eq!(config_manager.week_start().unwrap(), WeekStart::Monday);
}

#[test]
fn test_stored_values_override_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::DEFAULT_HORIZON_DAYS, "90").unwrap();
    insert_test_config(&conn, config_keys::MAX_HORIZON_DAYS, "730").unwrap();
    insert_test_config(&conn, config_keys::RESOLVE_OVERDUE_ON_READ, "false").unwrap();
    insert_test_config(&conn, config_keys::WEEK_START, "Sunday").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config_manager.default_horizon_days().unwrap(), 90);
    assert_eq!(config_manager.max_horizon_days().unwrap(), 730);
    assert!(!config_manager.resolve_overdue_on_read().unwrap());
    assert_eq!(config_manager.week_start().unwrap(), WeekStart::Sunday);
}

#[test]
fn test_malformed_values_fall_back() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::DEFAULT_HORIZON_DAYS, "一年").unwrap();
    insert_test_config(&conn, config_keys::MAX_HORIZON_DAYS, "-5").unwrap();
    insert_test_config(&conn, config_keys::WEEK_START, "friday").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config_manager.default_horizon_days().unwrap(), 365);
    assert_eq!(config_manager.max_horizon_days().unwrap(), 3650);
    assert_eq!(config_manager.week_start().unwrap(), WeekStart::Monday);
}

#[test]
fn test_set_and_snapshot() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_config_value(config_keys::DEFAULT_HORIZON_DAYS, "180")
        .unwrap();
    config_manager
        .set_config_value(config_keys::DEFAULT_HORIZON_DAYS, "200")
        .unwrap();
    config_manager.set_config_value("ui.theme", "dark").unwrap();

    assert_eq!(
        config_manager
            .get_config_value(config_keys::DEFAULT_HORIZON_DAYS)
            .unwrap()
            .as_deref(),
        Some("200")
    );

    let snapshot: serde_json::Value =
        serde_json::from_str(&config_manager.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::DEFAULT_HORIZON_DAYS], "200");
    assert_eq!(snapshot[config_keys::WEEK_START], "monday");
    assert_eq!(snapshot["ui.theme"], "dark");
}
