// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use equipment_maintenance::db::{init_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（已开启外键）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入 global 配置项
pub fn insert_test_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
         ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// 统计某台设备的维护事件数
pub fn count_events(conn: &Connection, equipment_id: &str) -> Result<i64, Box<dyn Error>> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM maintenance_event WHERE equipment_id = ?1",
        [equipment_id],
        |row| row.get(0),
    )?)
}

/// 日期构造简写
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("无效日期")
}
