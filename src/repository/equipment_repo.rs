// ==========================================
// 设备维护排程系统 - 设备与设备类型仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 设备与其周期集合在同一事务内写入
// ==========================================

use crate::db::{format_date, get_date, DATETIME_FORMAT};
use crate::domain::equipment::{Equipment, EquipmentType};
use crate::domain::periodicity::PeriodicitySet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::periodicity_repo::write_periodicities;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const EQUIPMENT_COLUMNS: &str = r#"
    q.equipment_id, q.name, q.model, q.description, q.type_id,
    q.installation_date, q.is_displayed, q.created_at
"#;

// 可见性过滤: 设备可见、已分类且类型可见、已于 today 前安装（未分类设备不可见）
const VISIBLE_FILTER: &str = r#"
    q.is_displayed = 1
    AND t.is_displayed = 1
    AND q.installation_date <= ?1
"#;

// ==========================================
// EquipmentTypeRepository - 设备类型仓储
// ==========================================
pub struct EquipmentTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentTypeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增设备类型
    ///
    /// # 错误
    /// - slug 重复 → UniqueConstraintViolation
    pub fn insert(&self, equipment_type: &EquipmentType) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO equipment_type (type_id, name, slug, is_displayed)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                equipment_type.type_id,
                equipment_type.name,
                equipment_type.slug,
                equipment_type.is_displayed,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<EquipmentType>> {
        let conn = self.get_conn()?;
        let equipment_type = conn
            .query_row(
                "SELECT type_id, name, slug, is_displayed FROM equipment_type WHERE slug = ?1",
                params![slug],
                map_type_row,
            )
            .optional()?;
        Ok(equipment_type)
    }

    /// 查询全部类型，按名称排序
    pub fn list_all(&self) -> RepositoryResult<Vec<EquipmentType>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT type_id, name, slug, is_displayed FROM equipment_type ORDER BY name, slug",
        )?;
        let types = stmt
            .query_map([], map_type_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }

    /// 设置类型是否显示
    ///
    /// # 错误
    /// - slug 不存在 → NotFound
    pub fn set_displayed(&self, slug: &str, is_displayed: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE equipment_type SET is_displayed = ?2 WHERE slug = ?1",
            params![slug, is_displayed],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("EquipmentType", slug));
        }
        Ok(())
    }
}

// ==========================================
// EquipmentRepository - 设备仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入设备及其周期集合
    ///
    /// # 红线
    /// - 设备行与周期行在同一事务内写入，任一失败整体回滚
    pub fn insert_with_periodicities(
        &self,
        equipment: &Equipment,
        set: &PeriodicitySet,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO equipment (
                equipment_id, name, model, description, type_id,
                installation_date, is_displayed, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                equipment.equipment_id,
                equipment.name,
                equipment.model,
                equipment.description,
                equipment.type_id,
                format_date(equipment.installation_date),
                equipment.is_displayed,
                equipment.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;
        write_periodicities(&tx, &equipment.equipment_id, set)?;

        tx.commit()?;
        Ok(())
    }

    pub fn find_by_id(&self, equipment_id: &str) -> RepositoryResult<Option<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM equipment q WHERE q.equipment_id = ?1",
            EQUIPMENT_COLUMNS
        );
        let equipment = conn
            .query_row(&sql, params![equipment_id], map_equipment_row)
            .optional()?;
        Ok(equipment)
    }

    /// 查询可见设备，按名称排序
    pub fn list_visible(&self, today: NaiveDate) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM equipment q
            JOIN equipment_type t ON t.type_id = q.type_id
            WHERE {}
            ORDER BY q.name, q.equipment_id
            "#,
            EQUIPMENT_COLUMNS, VISIBLE_FILTER
        );
        let mut stmt = conn.prepare(&sql)?;
        let equipment = stmt
            .query_map(params![format_date(today)], map_equipment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(equipment)
    }

    /// 查询指定类型下的可见设备
    pub fn list_visible_by_type(
        &self,
        type_id: &str,
        today: NaiveDate,
    ) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM equipment q
            JOIN equipment_type t ON t.type_id = q.type_id
            WHERE {} AND q.type_id = ?2
            ORDER BY q.name, q.equipment_id
            "#,
            EQUIPMENT_COLUMNS, VISIBLE_FILTER
        );
        let mut stmt = conn.prepare(&sql)?;
        let equipment = stmt
            .query_map(params![format_date(today), type_id], map_equipment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(equipment)
    }

    /// 删除设备（周期与事件级联删除）
    ///
    /// # 错误
    /// - 设备不存在 → NotFound
    pub fn delete(&self, equipment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM equipment WHERE equipment_id = ?1",
            params![equipment_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Equipment", equipment_id));
        }
        Ok(())
    }
}

fn map_type_row(row: &Row<'_>) -> rusqlite::Result<EquipmentType> {
    Ok(EquipmentType {
        type_id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        is_displayed: row.get(3)?,
    })
}

fn map_equipment_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    let raw_created: String = row.get(7)?;
    let created_at = NaiveDateTime::parse_from_str(&raw_created, DATETIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(Equipment {
        equipment_id: row.get(0)?,
        name: row.get(1)?,
        model: row.get(2)?,
        description: row.get(3)?,
        type_id: row.get(4)?,
        installation_date: get_date(row, 5)?,
        is_displayed: row.get(6)?,
        created_at,
    })
}
