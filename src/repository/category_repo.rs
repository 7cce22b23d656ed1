// ==========================================
// 设备维护排程系统 - 维护类别仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::category::MaintenanceCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

/// 维护类别目录仓储
/// 职责: 管理 maintenance_category 表
pub struct MaintenanceCategoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceCategoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部类别，按 (tier, category_id) 排序
    pub fn list_all(&self) -> RepositoryResult<Vec<MaintenanceCategory>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category_id, name, tier, base_periodicity_days
            FROM maintenance_category
            ORDER BY tier, category_id
            "#,
        )?;
        let categories = stmt
            .query_map([], map_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn find_by_id(&self, category_id: &str) -> RepositoryResult<Option<MaintenanceCategory>> {
        let conn = self.get_conn()?;
        let category = conn
            .query_row(
                r#"
                SELECT category_id, name, tier, base_periodicity_days
                FROM maintenance_category
                WHERE category_id = ?1
                "#,
                params![category_id],
                map_category_row,
            )
            .optional()?;
        Ok(category)
    }

    /// 新增类别
    ///
    /// # 错误
    /// - category_id 重复 → UniqueConstraintViolation
    pub fn insert(&self, category: &MaintenanceCategory) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_category (category_id, name, tier, base_periodicity_days)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                category.category_id,
                category.name,
                category.tier,
                category.base_periodicity_days,
            ],
        )?;
        Ok(())
    }
}

fn map_category_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceCategory> {
    Ok(MaintenanceCategory {
        category_id: row.get(0)?,
        name: row.get(1)?,
        tier: row.get(2)?,
        base_periodicity_days: row.get(3)?,
    })
}
