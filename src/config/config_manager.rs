// ==========================================
// 设备维护排程系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 未配置或格式错误时回退到默认值，并记录 warn
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::schedule_window::DEFAULT_HORIZON_DAYS;
use crate::domain::types::WeekStart;
use crate::engine::schedule_generator::DEFAULT_MAX_HORIZON_DAYS;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 读取并解析配置，缺失或解析失败时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    // ===== 排程配置 =====

    /// 默认排程跨度（天），非正值视为格式错误
    pub fn default_horizon_days(&self) -> Result<i64, Box<dyn Error>> {
        let days = self.get_parsed_or_default(config_keys::DEFAULT_HORIZON_DAYS, DEFAULT_HORIZON_DAYS)?;
        if days <= 0 {
            tracing::warn!(config_key = config_keys::DEFAULT_HORIZON_DAYS, days, "排程跨度必须为正，使用默认值");
            return Ok(DEFAULT_HORIZON_DAYS);
        }
        Ok(days)
    }

    /// 最大排程跨度（天）
    pub fn max_horizon_days(&self) -> Result<i64, Box<dyn Error>> {
        let days = self.get_parsed_or_default(config_keys::MAX_HORIZON_DAYS, DEFAULT_MAX_HORIZON_DAYS)?;
        if days <= 0 {
            tracing::warn!(config_key = config_keys::MAX_HORIZON_DAYS, days, "最大排程跨度必须为正，使用默认值");
            return Ok(DEFAULT_MAX_HORIZON_DAYS);
        }
        Ok(days)
    }

    /// 读取排程视图前是否先刷新逾期状态
    pub fn resolve_overdue_on_read(&self) -> Result<bool, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::RESOLVE_OVERDUE_ON_READ, true)
    }

    // ===== 日历配置 =====

    /// 月历每周起始日
    pub fn week_start(&self) -> Result<WeekStart, Box<dyn Error>> {
        let Some(raw) = self.get_config_value(config_keys::WEEK_START)? else {
            return Ok(WeekStart::default());
        };

        Ok(WeekStart::from_config_str(&raw).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::WEEK_START,
                raw_value = %raw,
                "周起始日配置无效，使用默认值"
            );
            WeekStart::default()
        }))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// 未写入 config_kv 的键以生效的默认值补齐
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        config_map.insert(
            config_keys::DEFAULT_HORIZON_DAYS.to_string(),
            self.default_horizon_days()?.to_string(),
        );
        config_map.insert(
            config_keys::MAX_HORIZON_DAYS.to_string(),
            self.max_horizon_days()?.to_string(),
        );
        config_map.insert(
            config_keys::RESOLVE_OVERDUE_ON_READ.to_string(),
            self.resolve_overdue_on_read()?.to_string(),
        );
        config_map.insert(
            config_keys::WEEK_START.to_string(),
            self.week_start()?.as_config_str().to_string(),
        );

        {
            let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            let mut stmt =
                conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
            let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (key, value) = row?;
                config_map.entry(key).or_insert(value);
            }
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排程
    pub const DEFAULT_HORIZON_DAYS: &str = "schedule.default_horizon_days";
    pub const MAX_HORIZON_DAYS: &str = "schedule.max_horizon_days";
    pub const RESOLVE_OVERDUE_ON_READ: &str = "schedule.resolve_overdue_on_read";

    // 日历
    pub const WEEK_START: &str = "calendar.week_start";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.default_horizon_days().unwrap(), 365);
        assert_eq!(config.max_horizon_days().unwrap(), 3650);
        assert!(config.resolve_overdue_on_read().unwrap());
        assert_eq!(config.week_start().unwrap(), WeekStart::Monday);
    }

    #[test]
    fn test_overrides_are_read_back() {
        let config = manager();
        config.set_config_value(config_keys::DEFAULT_HORIZON_DAYS, "90").unwrap();
        config.set_config_value(config_keys::WEEK_START, "sunday").unwrap();
        config.set_config_value(config_keys::RESOLVE_OVERDUE_ON_READ, "false").unwrap();

        assert_eq!(config.default_horizon_days().unwrap(), 90);
        assert_eq!(config.week_start().unwrap(), WeekStart::Sunday);
        assert!(!config.resolve_overdue_on_read().unwrap());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = manager();
        config.set_config_value(config_keys::DEFAULT_HORIZON_DAYS, "abc").unwrap();
        config.set_config_value(config_keys::MAX_HORIZON_DAYS, "-5").unwrap();
        config.set_config_value(config_keys::WEEK_START, "friday").unwrap();

        assert_eq!(config.default_horizon_days().unwrap(), 365);
        assert_eq!(config.max_horizon_days().unwrap(), 3650);
        assert_eq!(config.week_start().unwrap(), WeekStart::Monday);
    }

    #[test]
    fn test_snapshot_contains_effective_values() {
        let config = manager();
        config.set_config_value(config_keys::MAX_HORIZON_DAYS, "730").unwrap();

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::MAX_HORIZON_DAYS], "730");
        assert_eq!(snapshot[config_keys::DEFAULT_HORIZON_DAYS], "365");
        assert_eq!(snapshot[config_keys::WEEK_START], "monday");
    }
}
