// ==========================================
// 汽车服务预约系统 - 统计报表仓储
// ==========================================
// 只读: 所有方法只做 SELECT
// 并列排名: 按首次预约（最小 id）先后决定
// ==========================================

use crate::db::SharedConnection;
use crate::domain::booking::Booking;
use crate::domain::report::{RangeBookingRow, TopVehicle, VehicleBookingCount};
use crate::domain::types::BookingStatus;
use crate::repository::booking_repo::map_booking_row;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::build_in_clause;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult};

// ==========================================
// ReportRepository - 统计报表仓储
// ==========================================
pub struct ReportRepository {
    conn: SharedConnection,
}

impl ReportRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 计数
    // ==========================================

    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total = conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
        Ok(total)
    }

    pub fn count_by_status(&self, status: BookingStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total = conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 全部预约中次数最多的车辆
    pub fn most_frequent_vehicle(&self) -> RepositoryResult<Option<VehicleBookingCount>> {
        let conn = self.get_conn()?;
        let top = conn
            .query_row(
                r#"
                SELECT plate, COUNT(*) AS cnt
                FROM bookings
                GROUP BY plate
                ORDER BY cnt DESC, MIN(id) ASC
                LIMIT 1
                "#,
                [],
                |row| {
                    Ok(VehicleBookingCount {
                        plate: row.get(0)?,
                        count: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(top)
    }

    // ==========================================
    // 日期区间
    // ==========================================

    /// 区间内（含两端）的全部预约
    pub fn bookings_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<RangeBookingRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                b.id, b.date, b.status, b.plate,
                v.brand, v.model, c.name, c.phone
            FROM bookings b
            INNER JOIN vehicles v ON b.plate = v.plate
            INNER JOIN customers c ON v.owner_id = c.id
            WHERE b.date BETWEEN ?1 AND ?2
            ORDER BY DATE(b.date) ASC, b.id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![start_date, end_date], |row| {
                Ok(RangeBookingRow {
                    booking_id: row.get(0)?,
                    date: row.get(1)?,
                    status: row.get(2)?,
                    plate: row.get(3)?,
                    brand: row.get(4)?,
                    model: row.get(5)?,
                    owner_name: row.get(6)?,
                    owner_phone: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<RangeBookingRow>>>()?;
        Ok(rows)
    }

    /// 区间内未取消预约次数最多的车辆
    pub fn top_vehicle_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Option<TopVehicle>> {
        let conn = self.get_conn()?;
        let top = conn
            .query_row(
                r#"
                SELECT
                    b.plate, COUNT(*) AS cnt,
                    v.brand, v.model, c.name, c.phone
                FROM bookings b
                INNER JOIN vehicles v ON b.plate = v.plate
                INNER JOIN customers c ON v.owner_id = c.id
                WHERE b.date BETWEEN ?1 AND ?2
                  AND b.status != 'cancelled'
                GROUP BY b.plate
                ORDER BY cnt DESC, MIN(b.id) ASC
                LIMIT 1
                "#,
                params![start_date, end_date],
                |row| {
                    Ok(TopVehicle {
                        plate: row.get(0)?,
                        count: row.get(1)?,
                        brand: row.get(2)?,
                        model: row.get(3)?,
                        owner_name: row.get(4)?,
                        owner_phone: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(top)
    }

    // ==========================================
    // 单车履历
    // ==========================================

    /// 车牌匹配（LIKE 通配）的全部预约
    pub fn bookings_matching_plate(&self, plate_pattern: &str) -> RepositoryResult<Vec<Booking>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, plate, date, bay_number, description, status
            FROM bookings
            WHERE plate LIKE ?1
            ORDER BY DATE(date) ASC, id ASC
            "#,
        )?;
        let bookings = stmt
            .query_map(params![plate_pattern], map_booking_row)?
            .collect::<SqliteResult<Vec<Booking>>>()?;
        Ok(bookings)
    }

    /// 车牌匹配且日期不早于 `since` 的未取消预约数
    pub fn count_matching_plate_since(
        &self,
        plate_pattern: &str,
        since: NaiveDate,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE plate LIKE ?1
              AND status != 'cancelled'
              AND date >= ?2
            "#,
            params![plate_pattern, since],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 车牌匹配车辆的车主（姓名, 手机号）
    pub fn owner_matching_plate(
        &self,
        plate_pattern: &str,
    ) -> RepositoryResult<Option<(String, String)>> {
        let conn = self.get_conn()?;
        let owner = conn
            .query_row(
                r#"
                SELECT c.name, c.phone
                FROM customers c
                JOIN vehicles v ON c.id = v.owner_id
                WHERE v.plate LIKE ?1
                ORDER BY v.plate
                LIMIT 1
                "#,
                params![plate_pattern],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(owner)
    }

    // ==========================================
    // 品牌
    // ==========================================

    /// 指定品牌车辆在 [from, to] 内的全部预约（任意状态）
    pub fn bookings_for_brands(
        &self,
        brands: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        if brands.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT b.id, b.plate, b.date, b.bay_number, b.description, b.status
            FROM bookings b
            INNER JOIN vehicles v ON b.plate = v.plate
            WHERE {}
              AND b.date BETWEEN ? AND ?
            ORDER BY DATE(b.date) ASC, b.id ASC
            "#,
            build_in_clause("v.brand", brands)
        );

        let mut values: Vec<String> = brands.to_vec();
        values.push(from.format("%Y-%m-%d").to_string());
        values.push(to.format("%Y-%m-%d").to_string());

        let mut stmt = conn.prepare(&sql)?;
        let bookings = stmt
            .query_map(params_from_iter(values.iter()), map_booking_row)?
            .collect::<SqliteResult<Vec<Booking>>>()?;
        Ok(bookings)
    }
}
