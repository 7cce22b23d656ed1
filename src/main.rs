// ==========================================
// 设备维护排程系统 - 逾期状态刷新工具
// ==========================================
// 用法:
//   maintenance-refresh [db_path] [YYYY-MM-DD]
//
// 不传 db_path 时使用默认数据库路径（可由 MAINTENANCE_DB_PATH 覆写）；
// 不传日期时以本地今天为参考日期
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use equipment_maintenance::app::get_default_db_path;
use equipment_maintenance::db::{init_schema, open_sqlite_connection, DATE_FORMAT};
use equipment_maintenance::engine::StatusResolver;
use equipment_maintenance::logging;
use equipment_maintenance::repository::MaintenanceEventRepository;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    let today = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .with_context(|| format!("无效的参考日期: {} (格式应为 YYYY-MM-DD)", raw))?,
        None => Local::now().date_naive(),
    };

    tracing::info!(db_path = %db_path, %today, "开始刷新维护事件逾期状态");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库初始化失败")?;

    let event_repo = Arc::new(MaintenanceEventRepository::new(Arc::new(Mutex::new(conn))));
    let resolver = StatusResolver::new(event_repo);
    let updated = resolver.resolve_overdue(today)?;

    println!("overdue_updated={}", updated);
    Ok(())
}
