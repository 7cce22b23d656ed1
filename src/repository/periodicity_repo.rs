// ==========================================
// 设备维护排程系统 - 设备周期仓储
// ==========================================
// 红线: 周期集合整体替换，不出现部分写入
// ==========================================

use crate::domain::periodicity::PeriodicitySet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 设备周期仓储
/// 职责: 管理 equipment_periodicity 表
pub struct PeriodicityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PeriodicityRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取设备的周期集合（无记录返回空集合）
    pub fn find_by_equipment(&self, equipment_id: &str) -> RepositoryResult<PeriodicitySet> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category_id, periodicity_days
            FROM equipment_periodicity
            WHERE equipment_id = ?1
            "#,
        )?;
        let set = stmt
            .query_map(params![equipment_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<PeriodicitySet, _>>()?;
        Ok(set)
    }

    /// 整体替换设备的周期集合
    ///
    /// # 红线
    /// - 删除旧集合与写入新集合在同一事务内完成
    pub fn replace_for_equipment(
        &self,
        equipment_id: &str,
        set: &PeriodicitySet,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM equipment_periodicity WHERE equipment_id = ?1",
            params![equipment_id],
        )?;
        write_periodicities(&tx, equipment_id, set)?;

        tx.commit()?;
        Ok(())
    }
}

/// 在已有事务/连接上写入周期集合
pub(crate) fn write_periodicities(
    conn: &Connection,
    equipment_id: &str,
    set: &PeriodicitySet,
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO equipment_periodicity (equipment_id, category_id, periodicity_days)
        VALUES (?1, ?2, ?3)
        "#,
    )?;
    for (category_id, periodicity_days) in set.iter() {
        stmt.execute(params![equipment_id, category_id, periodicity_days])?;
    }
    Ok(())
}
