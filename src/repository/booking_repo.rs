// ==========================================
// 汽车服务预约系统 - 预约数据仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 工位选择规则、状态迁移规则由 engine 层以闭包传入
// 并发: 分配与状态迁移均在 BEGIN IMMEDIATE 事务中完成
// ==========================================

mod queries;


pub use queries::{BookingOrder, StatusFilter};

use crate::db::SharedConnection;
use crate::domain::booking::Booking;
use crate::domain::types::{BookingStatus, OccupancyPolicy};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

/// 新预约写入参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub plate: String,
    pub date: NaiveDate,
    pub description: String,
}

// ==========================================
// BookingRepository - 预约仓储
// ==========================================
pub struct BookingRepository {
    conn: SharedConnection,
}

impl BookingRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 在单个写事务内: 读取当日已占工位 → 由 `select_bay` 选定工位 → 插入预约
    ///
    /// # 参数
    /// - `booking`: 预约参数
    /// - `policy`: 工位占用口径
    /// - `select_bay`: 选位规则；返回 None 表示无可用工位
    ///
    /// # 返回
    /// - Ok(Some(Booking)): 已写入
    /// - Ok(None): 无可用工位，事务回滚，未写入任何记录
    /// - Err(UniqueConstraintViolation): 工位被其他连接抢占（调用方可重算重试）
    pub fn insert_with_bay_selection<F>(
        &self,
        booking: &NewBooking,
        policy: OccupancyPolicy,
        select_bay: F,
    ) -> RepositoryResult<Option<Booking>>
    where
        F: FnOnce(&BTreeSet<u32>) -> Option<u32>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken = occupied_bays_on(&tx, booking.date, policy)?;
        let bay_number = match select_bay(&taken) {
            Some(bay) => bay,
            None => return Ok(None),
        };

        tx.execute(
            r#"
            INSERT INTO bookings (plate, date, bay_number, description, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                booking.plate,
                booking.date,
                bay_number,
                booking.description,
                BookingStatus::Scheduled,
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Some(Booking {
            id,
            plate: booking.plate.clone(),
            date: booking.date,
            bay_number,
            description: booking.description.clone(),
            status: BookingStatus::Scheduled,
        }))
    }

    /// 无条件覆写状态（不读取当前状态）
    ///
    /// # 返回
    /// - Ok(true): 已更新
    /// - Ok(false): 预约不存在
    pub fn update_status(&self, booking_id: i64, status: BookingStatus) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE bookings SET status = ?1 WHERE id = ?2",
            params![status, booking_id],
        )?;
        Ok(affected > 0)
    }

    /// 带校验的状态迁移: 事务内读取当前状态 → `validate` → 写入目标状态
    ///
    /// # 返回
    /// - Ok(Some(previous)): 已迁移，返回迁移前状态
    /// - Ok(None): 预约不存在
    /// - Err: `validate` 拒绝或存储错误（事务回滚）
    pub fn transition_status<F>(
        &self,
        booking_id: i64,
        target: BookingStatus,
        validate: F,
    ) -> RepositoryResult<Option<BookingStatus>>
    where
        F: FnOnce(BookingStatus) -> RepositoryResult<()>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<BookingStatus> = tx
            .query_row(
                "SELECT status FROM bookings WHERE id = ?1",
                params![booking_id],
                |row| row.get(0),
            )
            .optional()?;

        let current = match current {
            Some(status) => status,
            None => return Ok(None),
        };

        validate(current)?;

        tx.execute(
            "UPDATE bookings SET status = ?1 WHERE id = ?2",
            params![target, booking_id],
        )?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Some(current))
    }

    /// 物理删除预约（绕过生命周期，用于错误录入）
    pub fn delete(&self, booking_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM bookings WHERE id = ?1", params![booking_id])?;
        Ok(affected > 0)
    }
}

/// 查询某日已占用的工位号（去重）
pub(crate) fn occupied_bays_on(
    conn: &Connection,
    date: NaiveDate,
    policy: OccupancyPolicy,
) -> RepositoryResult<BTreeSet<u32>> {
    let sql = match policy {
        OccupancyPolicy::ActiveOnly => {
            "SELECT DISTINCT bay_number FROM bookings \
             WHERE date = ?1 AND status IN ('scheduled', 'in_progress')"
        }
        OccupancyPolicy::LegacyAllRows => "SELECT DISTINCT bay_number FROM bookings WHERE date = ?1",
    };

    let mut stmt = conn.prepare(sql)?;
    let bays = stmt
        .query_map(params![date], |row| row.get::<_, u32>(0))?
        .collect::<rusqlite::Result<BTreeSet<u32>>>()?;
    Ok(bays)
}

/// 映射 bookings 表整行（列顺序: id, plate, date, bay_number, description, status）
pub(crate) fn map_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        plate: row.get(1)?,
        date: row.get(2)?,
        bay_number: row.get(3)?,
        description: row.get(4)?,
        status: row.get(5)?,
    })
}
