// ==========================================
// 汽车服务预约系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键级联依赖 foreign_keys=ON）
// - 统一 busy_timeout，多连接并发分配工位时排队等待而不是直接报 busy
// - 提供 customers / vehicles / bookings / config_kv 的建表脚本
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 共享连接句柄（所有仓储注入同一个句柄，按操作加锁获取）
pub type SharedConnection = Arc<Mutex<Connection>>;

/// 建表脚本
///
/// 说明：
/// - vehicles.owner_id → customers.id 级联删除
/// - bookings.plate → vehicles.plate 级联删除
/// - bay_number 限定在固定工位池 1..=5
/// - 部分唯一索引保证同一日期的有效预约不会占用同一个工位
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id INTEGER UNIQUE,
    handle TEXT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS vehicles (
    owner_id INTEGER REFERENCES customers(id) ON DELETE CASCADE,
    plate TEXT PRIMARY KEY,
    brand TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER,
    color TEXT,
    wrapped INTEGER NOT NULL DEFAULT 0,
    repainted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_vehicles_owner ON vehicles(owner_id);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plate TEXT NOT NULL REFERENCES vehicles(plate) ON DELETE CASCADE,
    date TEXT NOT NULL,
    bay_number INTEGER NOT NULL CHECK(bay_number BETWEEN 1 AND 5),
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'scheduled'
        CHECK(status IN ('scheduled', 'in_progress', 'completed', 'cancelled'))
);

CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);
CREATE INDEX IF NOT EXISTS idx_bookings_plate ON bookings(plate);
CREATE UNIQUE INDEX IF NOT EXISTS uq_bookings_active_bay
    ON bookings(date, bay_number)
    WHERE status IN ('scheduled', 'in_progress');

CREATE TABLE IF NOT EXISTS config_kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启，否则级联删除不生效
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    open_sqlite_connection_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT_MS)
}

/// 打开 SQLite 连接（自定义 busy_timeout）
pub fn open_sqlite_connection_with_timeout(
    db_path: &str,
    busy_timeout_ms: u64,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn, busy_timeout_ms)?;
    Ok(conn)
}

/// 打开内存库并建表（测试与临时场景使用）
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn, DEFAULT_BUSY_TIMEOUT_MS)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// 包装为共享句柄
pub fn into_shared(conn: Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

/// 建表（幂等）并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    if let Some(version) = read_schema_version(conn)? {
        if version > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                "数据库 schema_version={} 高于代码期望值 {}，可能由更新版本创建",
                version,
                CURRENT_SCHEMA_VERSION
            );
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_absent_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(fk, 1);
    }
}
