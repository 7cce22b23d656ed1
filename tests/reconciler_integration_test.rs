// ==========================================
// 对账与仓储集成测试
// ==========================================
// 测试目标:
// 1. 对账事务失败时回滚，已有数据不变
// 2. 外键级联与限制
// 3. 逾期批量更新只作用于 scheduled
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};

use equipment_maintenance::domain::{
    CandidateEvent, MaintenanceEvent, MaintenanceStatus, PeriodicitySet, ReconcilePlan,
    ScheduleWindow,
};
use equipment_maintenance::engine::{ScheduleGenerator, ScheduleReconciler, StatusResolver};
use equipment_maintenance::repository::{
    MaintenanceCategoryRepository, MaintenanceEventRepository, RepositoryError,
};
use rusqlite::Connection;
use chrono::NaiveDate;
use test_helpers::{create_test_db, d, open_test_connection};

fn setup() -> (tempfile::NamedTempFile, Arc<Mutex<Connection>>) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    conn.execute(
        "INSERT INTO equipment (equipment_id, name, installation_date, created_at)
         VALUES ('eq1', 'Press', '2024-01-01', '2024-01-01 00:00:00')",
        [],
    )
    .unwrap();
    (temp_file, Arc::new(Mutex::new(conn)))
}

fn candidates(window: &ScheduleWindow, conn: &Arc<Mutex<Connection>>) -> Vec<CandidateEvent> {
    let catalog = MaintenanceCategoryRepository::new(conn.clone()).list_all().unwrap();
    let set = PeriodicitySet::new().with("routine", 10).with("repair", 30);
    ScheduleGenerator::new()
        .generate("eq1", &set, &catalog, window)
        .unwrap()
}

fn scheduled_event(category_id: &str, planned_date: NaiveDate) -> MaintenanceEvent {
    CandidateEvent {
        equipment_id: "eq1".to_string(),
        category_id: category_id.to_string(),
        tier: 0,
        planned_date,
        status: MaintenanceStatus::Scheduled,
    }
    .into_event()
}

#[test]
fn test_reconcile_persists_and_is_idempotent() {
    let (_temp_file, conn) = setup();
    let event_repo = Arc::new(MaintenanceEventRepository::new(conn.clone()));
    let reconciler = ScheduleReconciler::new(event_repo.clone());
    let window = ScheduleWindow::with_horizon(d(2024, 1, 1), 90).unwrap();
    let candidates = candidates(&window, &conn);

    let first = reconciler.reconcile("eq1", &candidates, &window).unwrap();
    assert_eq!(first.created, 12);

    let ids_before: Vec<String> = event_repo
        .find_in_window("eq1", window.start(), window.end())
        .unwrap()
        .into_iter()
        .map(|e| e.event_id)
        .collect();

    let second = reconciler.reconcile("eq1", &candidates, &window).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(second.unchanged, 12);

    let ids_after: Vec<String> = event_repo
        .find_in_window("eq1", window.start(), window.end())
        .unwrap()
        .into_iter()
        .map(|e| e.event_id)
        .collect();
    assert_eq!(ids_before, ids_after);
}

#[test]
fn test_failed_reconcile_rolls_back() {
    let (_temp_file, conn) = setup();
    let event_repo = Arc::new(MaintenanceEventRepository::new(conn.clone()));
    let reconciler = ScheduleReconciler::new(event_repo.clone());
    let window = ScheduleWindow::with_horizon(d(2024, 1, 1), 90).unwrap();
    reconciler
        .reconcile("eq1", &candidates(&window, &conn), &window)
        .unwrap();
    let before = event_repo
        .find_in_window("eq1", window.start(), window.end())
        .unwrap();

    // 删除全部后插入两条同键事件：第二条违反唯一约束
    let result = event_repo.reconcile_window("eq1", window.start(), window.end(), |existing| {
        ReconcilePlan {
            to_delete: existing.iter().map(|e| e.event_id.clone()).collect(),
            to_insert: vec![
                scheduled_event("routine", d(2024, 2, 1)),
                scheduled_event("routine", d(2024, 2, 1)),
            ],
            ..ReconcilePlan::default()
        }
    });
    assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));

    let after = event_repo
        .find_in_window("eq1", window.start(), window.end())
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_category_in_use_cannot_be_deleted() {
    let (_temp_file, conn) = setup();
    let event_repo = Arc::new(MaintenanceEventRepository::new(conn.clone()));
    let window = ScheduleWindow::with_horizon(d(2024, 1, 1), 30).unwrap();
    ScheduleReconciler::new(event_repo)
        .reconcile("eq1", &candidates(&window, &conn), &window)
        .unwrap();

    let guard = conn.lock().unwrap();
    let result = guard.execute("DELETE FROM maintenance_category WHERE category_id = 'routine'", []);
    assert!(result.is_err());
}

#[test]
fn test_mark_overdue_only_touches_scheduled() {
    let (_temp_file, conn) = setup();
    let event_repo = Arc::new(MaintenanceEventRepository::new(conn.clone()));
    let window = ScheduleWindow::with_horizon(d(2024, 1, 1), 30).unwrap();
    ScheduleReconciler::new(event_repo.clone())
        .reconcile("eq1", &candidates(&window, &conn), &window)
        .unwrap();

    {
        let guard = conn.lock().unwrap();
        guard
            .execute(
                "UPDATE maintenance_event SET status = 'completed', actual_date = planned_date
                 WHERE planned_date = '2024-01-11'",
                [],
            )
            .unwrap();
    }

    let resolver = StatusResolver::new(event_repo.clone());
    // 2024-01-11 已完成，2024-01-21 逾期，2024-01-31 (例行 + 维修) 当天到期不算逾期
    assert_eq!(resolver.resolve_overdue(d(2024, 1, 31)).unwrap(), 1);
    assert_eq!(resolver.resolve_overdue(d(2024, 1, 31)).unwrap(), 0);

    let events = event_repo
        .find_in_window("eq1", window.start(), window.end())
        .unwrap();
    let statuses: Vec<(_, _)> = events.iter().map(|e| (e.planned_date, e.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (d(2024, 1, 11), MaintenanceStatus::Completed),
            (d(2024, 1, 21), MaintenanceStatus::Overdue),
            (d(2024, 1, 31), MaintenanceStatus::Scheduled),
            (d(2024, 1, 31), MaintenanceStatus::Scheduled),
        ]
    );

    assert_eq!(resolver.resolve_overdue_for_equipment("other", d(2025, 1, 1)).unwrap(), 0);
}
