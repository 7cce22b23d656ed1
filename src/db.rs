// ==========================================
// 设备维护排程系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键级联依赖 foreign_keys）
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建库脚本与日期列的读写格式
// ==========================================

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 日期列统一存储格式（ISO 8601，字符串比较即日期比较）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 时间戳列统一存储格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 建库脚本
///
/// 说明：
/// - equipment 删除时级联删除 equipment_periodicity / maintenance_event
/// - maintenance_category 被引用时禁止删除
/// - (equipment_id, category_id, planned_date) 唯一，保证重复生成不产生重复行
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS equipment_type (
    type_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    is_displayed INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS equipment (
    equipment_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    model TEXT NOT NULL DEFAULT '',
    description TEXT,
    type_id TEXT REFERENCES equipment_type(type_id) ON DELETE SET NULL,
    installation_date TEXT NOT NULL,
    is_displayed INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS maintenance_category (
    category_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    tier INTEGER NOT NULL,
    base_periodicity_days INTEGER
);

CREATE TABLE IF NOT EXISTS equipment_periodicity (
    equipment_id TEXT NOT NULL REFERENCES equipment(equipment_id) ON DELETE CASCADE,
    category_id TEXT NOT NULL REFERENCES maintenance_category(category_id) ON DELETE RESTRICT,
    periodicity_days INTEGER NOT NULL CHECK (periodicity_days > 0),
    PRIMARY KEY (equipment_id, category_id)
);

CREATE TABLE IF NOT EXISTS maintenance_event (
    event_id TEXT PRIMARY KEY,
    equipment_id TEXT NOT NULL REFERENCES equipment(equipment_id) ON DELETE CASCADE,
    category_id TEXT NOT NULL REFERENCES maintenance_category(category_id) ON DELETE RESTRICT,
    planned_date TEXT NOT NULL,
    actual_date TEXT,
    status TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    UNIQUE (equipment_id, category_id, planned_date)
);

CREATE INDEX IF NOT EXISTS idx_maintenance_event_window
    ON maintenance_event (equipment_id, planned_date);

CREATE INDEX IF NOT EXISTS idx_maintenance_event_status_date
    ON maintenance_event (status, planned_date);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启（级联删除依赖此项）
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 建表、写入 schema_version、补齐默认维护类别。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    for category in crate::domain::category::default_catalog() {
        conn.execute(
            r#"
            INSERT OR IGNORE INTO maintenance_category (category_id, name, tier, base_periodicity_days)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            rusqlite::params![
                category.category_id,
                category.name,
                category.tier,
                category.base_periodicity_days,
            ],
        )?;
    }

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 日期 → 存储字符串
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 读取必填日期列
///
/// 格式错误时返回 FromSqlConversionFailure，而不是静默回退到默认日期。
pub fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 读取可空日期列
pub fn get_optional_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(None),
    }
}
