// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、AppState 与种子数据
// ==========================================
#![allow(dead_code)]

use autoservice_booking::db;
use autoservice_booking::{AppState, BookingConfig, NewCustomer, Vehicle};
use chrono::NaiveDate;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 基于临时数据库创建 AppState
pub fn create_test_state(config: BookingConfig) -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::from_config(BookingConfig { db_path, ..config })
        .expect("Failed to create AppState");
    (temp_file, state)
}

/// 默认配置的 AppState
pub fn default_state() -> (NamedTempFile, AppState) {
    create_test_state(BookingConfig::default())
}

/// 登记客户及一辆车，返回客户 id
pub fn seed_customer_with_vehicle(
    state: &AppState,
    name: &str,
    phone: &str,
    plate: &str,
    brand: &str,
) -> i64 {
    state
        .customer_repo
        .register(&NewCustomer::new(name, phone))
        .expect("Failed to register customer");
    let owner_id = state
        .customer_repo
        .find_by_phone(phone)
        .expect("Failed to query customer")
        .expect("customer should exist")
        .id;
    state
        .vehicle_repo
        .register(&Vehicle::new(plate, owner_id, brand, "Model"))
        .expect("Failed to register vehicle");
    owner_id
}

/// 为已有客户追加一辆车
pub fn add_vehicle(state: &AppState, owner_id: i64, plate: &str, brand: &str) {
    state
        .vehicle_repo
        .register(&Vehicle::new(plate, owner_id, brand, "Model"))
        .expect("Failed to register vehicle");
}

/// bookings 表总行数
pub fn booking_row_count(state: &AppState) -> i64 {
    state.reporting.count_total().expect("Failed to count bookings")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
