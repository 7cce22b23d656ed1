// ==========================================
// 设备维护排程系统 - 维护事件仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 对账的删除与插入必须在同一事务内完成
// ==========================================

use crate::db::{format_date, get_date, get_optional_date};
use crate::domain::maintenance_event::{MaintenanceEvent, MaintenanceEventUpdate};
use crate::domain::reconcile::ReconcilePlan;
use crate::domain::types::MaintenanceStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const EVENT_COLUMNS: &str = r#"
    e.event_id, e.equipment_id, e.category_id,
    e.planned_date, e.actual_date, e.status, e.notes
"#;

// ==========================================
// MaintenanceEventRepository - 维护事件仓储
// ==========================================
/// 维护事件仓储
/// 职责: 管理 maintenance_event 表的查询、人工录入、逾期批量更新、对账落库
pub struct MaintenanceEventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceEventRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按ID查询
    pub fn find_by_id(&self, event_id: &str) -> RepositoryResult<Option<MaintenanceEvent>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM maintenance_event e WHERE e.event_id = ?1",
            EVENT_COLUMNS
        );
        let event = conn
            .query_row(&sql, params![event_id], map_event_row)
            .optional()?;
        Ok(event)
    }

    /// 查询单台设备在 [start, end] 内的事件
    ///
    /// 排序: planned_date → 类别层级 → category_id
    pub fn find_in_window(
        &self,
        equipment_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<MaintenanceEvent>> {
        let conn = self.get_conn()?;
        select_window(&conn, equipment_id, start, end)
    }

    /// 查询全部设备在 [start, end] 内的事件
    ///
    /// 排序: planned_date → 设备名称 → 类别层级 → category_id
    pub fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<MaintenanceEvent>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM maintenance_event e
            JOIN equipment q ON q.equipment_id = e.equipment_id
            JOIN maintenance_category c ON c.category_id = e.category_id
            WHERE e.planned_date >= ?1 AND e.planned_date <= ?2
            ORDER BY e.planned_date, q.name, e.equipment_id, c.tier, e.category_id
            "#,
            EVENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![format_date(start), format_date(end)], map_event_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// 单台设备最晚的计划日期（无事件返回 None）
    pub fn latest_planned_date(&self, equipment_id: &str) -> RepositoryResult<Option<NaiveDate>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn.query_row(
            "SELECT MAX(planned_date) FROM maintenance_event WHERE equipment_id = ?1",
            params![equipment_id],
            |row| row.get(0),
        )?;

        match raw {
            Some(value) => NaiveDate::parse_from_str(&value, crate::db::DATE_FORMAT)
                .map(Some)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "planned_date".to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// 写入人工录入结果 (actual_date / status / notes)
    ///
    /// # 错误
    /// - 事件不存在 → NotFound
    pub fn update_result(
        &self,
        event_id: &str,
        update: &MaintenanceEventUpdate,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE maintenance_event
            SET actual_date = ?2, status = ?3, notes = ?4
            WHERE event_id = ?1
            "#,
            params![
                event_id,
                update.actual_date.map(format_date),
                update.status.as_db_str(),
                update.notes,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found("MaintenanceEvent", event_id));
        }
        Ok(())
    }

    /// 批量更新逾期状态
    ///
    /// scheduled 且 planned_date < today 的事件改为 overdue；
    /// equipment_id 为 None 时作用于全部设备
    ///
    /// # 返回
    /// 受影响的行数
    pub fn mark_overdue_before(
        &self,
        today: NaiveDate,
        equipment_id: Option<&str>,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = match equipment_id {
            Some(id) => conn.execute(
                r#"
                UPDATE maintenance_event
                SET status = ?1
                WHERE status = ?2 AND planned_date < ?3 AND equipment_id = ?4
                "#,
                params![
                    MaintenanceStatus::Overdue.as_db_str(),
                    MaintenanceStatus::Scheduled.as_db_str(),
                    format_date(today),
                    id,
                ],
            )?,
            None => conn.execute(
                r#"
                UPDATE maintenance_event
                SET status = ?1
                WHERE status = ?2 AND planned_date < ?3
                "#,
                params![
                    MaintenanceStatus::Overdue.as_db_str(),
                    MaintenanceStatus::Scheduled.as_db_str(),
                    format_date(today),
                ],
            )?,
        };
        Ok(rows)
    }

    /// 对账落库
    ///
    /// 在单个事务内: 读取窗口内事件 → 调用 planner 计算计划 → 删除 → 插入 → 提交。
    /// 任一步失败时事务回滚，已有数据保持不变。
    ///
    /// # 返回
    /// 实际执行的对账计划
    pub fn reconcile_window<F>(
        &self,
        equipment_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        planner: F,
    ) -> RepositoryResult<ReconcilePlan>
    where
        F: FnOnce(&[MaintenanceEvent]) -> ReconcilePlan,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let existing = select_window(&tx, equipment_id, start, end)?;
        let plan = planner(&existing);

        {
            let mut delete_stmt = tx.prepare("DELETE FROM maintenance_event WHERE event_id = ?1")?;
            for event_id in &plan.to_delete {
                delete_stmt.execute(params![event_id])?;
            }

            let mut insert_stmt = tx.prepare(
                r#"
                INSERT INTO maintenance_event (
                    event_id, equipment_id, category_id,
                    planned_date, actual_date, status, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for event in &plan.to_insert {
                insert_stmt.execute(params![
                    event.event_id,
                    event.equipment_id,
                    event.category_id,
                    format_date(event.planned_date),
                    event.actual_date.map(format_date),
                    event.status.as_db_str(),
                    event.notes,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::debug!(
            equipment_id,
            existing = existing.len(),
            deleted = plan.to_delete.len(),
            inserted = plan.to_insert.len(),
            "对账事务已提交"
        );

        Ok(plan)
    }
}

fn select_window(
    conn: &Connection,
    equipment_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> RepositoryResult<Vec<MaintenanceEvent>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM maintenance_event e
        JOIN maintenance_category c ON c.category_id = e.category_id
        WHERE e.equipment_id = ?1 AND e.planned_date >= ?2 AND e.planned_date <= ?3
        ORDER BY e.planned_date, c.tier, e.category_id
        "#,
        EVENT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let events = stmt
        .query_map(
            params![equipment_id, format_date(start), format_date(end)],
            map_event_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

fn map_event_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceEvent> {
    let raw_status: String = row.get(5)?;
    let status = MaintenanceStatus::from_db_str(&raw_status)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(5, "status".to_string(), Type::Text))?;

    Ok(MaintenanceEvent {
        event_id: row.get(0)?,
        equipment_id: row.get(1)?,
        category_id: row.get(2)?,
        planned_date: get_date(row, 3)?,
        actual_date: get_optional_date(row, 4)?,
        status,
        notes: row.get(6)?,
    })
}
