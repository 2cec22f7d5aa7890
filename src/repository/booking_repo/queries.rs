use super::{map_booking_row, occupied_bays_on, BookingRepository};
use crate::domain::booking::{Booking, BookingOverview};
use crate::domain::types::{BookingStatus, OccupancyPolicy};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{build_in_clause, build_not_in_clause};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, OptionalExtension, Result as SqliteResult};
use std::collections::BTreeSet;

/// 状态过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// 状态属于集合
    AnyOf(Vec<BookingStatus>),
    /// 状态不属于集合
    NoneOf(Vec<BookingStatus>),
}

impl StatusFilter {
    fn to_clause(&self) -> (String, Vec<&'static str>) {
        match self {
            StatusFilter::AnyOf(statuses) => {
                let codes: Vec<&'static str> = statuses.iter().map(|s| s.as_str()).collect();
                (build_in_clause("b.status", &codes), codes)
            }
            StatusFilter::NoneOf(statuses) => {
                let codes: Vec<&'static str> = statuses.iter().map(|s| s.as_str()).collect();
                (build_not_in_clause("b.status", &codes), codes)
            }
        }
    }
}

/// 列表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOrder {
    /// 施工中在前、已预约在后，再按日期升序
    StatusPriorityThenDate,
    /// 按日期升序
    Date,
}

impl BookingOrder {
    fn to_sql(self) -> &'static str {
        match self {
            BookingOrder::StatusPriorityThenDate => {
                "CASE b.status WHEN 'in_progress' THEN 1 WHEN 'scheduled' THEN 2 ELSE 3 END, \
                 DATE(b.date) ASC, b.id ASC"
            }
            BookingOrder::Date => "DATE(b.date) ASC, b.id ASC",
        }
    }
}

impl BookingRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, booking_id: i64) -> RepositoryResult<Option<Booking>> {
        let conn = self.get_conn()?;
        let booking = conn
            .query_row(
                r#"
                SELECT id, plate, date, bay_number, description, status
                FROM bookings
                WHERE id = ?1
                "#,
                params![booking_id],
                map_booking_row,
            )
            .optional()?;
        Ok(booking)
    }

    /// 查询某日已占用的工位号
    pub fn occupied_bays(
        &self,
        date: NaiveDate,
        policy: OccupancyPolicy,
    ) -> RepositoryResult<BTreeSet<u32>> {
        let conn = self.get_conn()?;
        occupied_bays_on(&conn, date, policy)
    }

    /// 按车牌查询全部预约（日期升序）
    pub fn list_by_plate(&self, plate: &str) -> RepositoryResult<Vec<Booking>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, plate, date, bay_number, description, status
            FROM bookings
            WHERE plate = ?1
            ORDER BY DATE(date) ASC, id ASC
            "#,
        )?;
        let bookings = stmt
            .query_map(params![plate], map_booking_row)?
            .collect::<SqliteResult<Vec<Booking>>>()?;
        Ok(bookings)
    }

    /// 按状态过滤的预约列表（含车辆与车主信息）
    pub fn list_overviews(
        &self,
        filter: &StatusFilter,
        order: BookingOrder,
    ) -> RepositoryResult<Vec<BookingOverview>> {
        let conn = self.get_conn()?;
        let (clause, codes) = filter.to_clause();

        let sql = format!(
            r#"
            SELECT
                b.id, b.date, b.bay_number, b.description, b.status,
                v.plate, v.brand, v.model, v.year, v.color,
                c.name, c.phone, c.handle
            FROM bookings b
            JOIN vehicles v ON b.plate = v.plate
            JOIN customers c ON v.owner_id = c.id
            WHERE {}
            ORDER BY {}
            "#,
            clause,
            order.to_sql()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(codes.iter()), |row| {
                Ok(BookingOverview {
                    booking_id: row.get(0)?,
                    date: row.get(1)?,
                    bay_number: row.get(2)?,
                    description: row.get(3)?,
                    status: row.get(4)?,
                    plate: row.get(5)?,
                    brand: row.get(6)?,
                    model: row.get(7)?,
                    year: row.get(8)?,
                    color: row.get(9)?,
                    owner_name: row.get(10)?,
                    owner_phone: row.get(11)?,
                    owner_handle: row.get(12)?,
                })
            })?
            .collect::<SqliteResult<Vec<BookingOverview>>>()?;

        Ok(rows)
    }
}
