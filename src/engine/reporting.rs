// ==========================================
// 汽车服务预约系统 - 统计报表视图
// ==========================================
// 只读: 不修改任何数据
// "今天" 相关的视图均提供 *_from(today, ..) 版本便于确定性调用
// ==========================================

use crate::domain::booking::Booking;
use crate::domain::report::{RangeReport, VehicleBookingCount, VehicleHistory};
use crate::domain::types::BookingStatus;
use crate::engine::window::{check_window, shift_days};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::report_repo::ReportRepository;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

// ==========================================
// ReportingViews - 统计报表
// ==========================================
pub struct ReportingViews {
    report_repo: Arc<ReportRepository>,
    history_window_days: u32,
}

impl ReportingViews {
    pub fn new(report_repo: Arc<ReportRepository>, history_window_days: u32) -> Self {
        Self {
            report_repo,
            history_window_days,
        }
    }

    // ==========================================
    // 计数
    // ==========================================

    pub fn count_total(&self) -> RepositoryResult<i64> {
        self.report_repo.count_all()
    }

    pub fn count_completed(&self) -> RepositoryResult<i64> {
        self.report_repo.count_by_status(BookingStatus::Completed)
    }

    pub fn count_cancelled(&self) -> RepositoryResult<i64> {
        self.report_repo.count_by_status(BookingStatus::Cancelled)
    }

    /// 全部预约中次数最多的车辆
    pub fn most_frequent_vehicle(&self) -> RepositoryResult<Option<VehicleBookingCount>> {
        self.report_repo.most_frequent_vehicle()
    }

    // ==========================================
    // 区间报表
    // ==========================================

    /// 区间（含两端）内的全部预约 + 未取消预约最多的车辆
    pub fn range_report(&self, start_date: NaiveDate, end_date: NaiveDate) -> RepositoryResult<RangeReport> {
        if start_date > end_date {
            return Err(RepositoryError::FieldValueError {
                field: "date_range".to_string(),
                message: format!("起始日期 {} 晚于结束日期 {}", start_date, end_date),
            });
        }

        let bookings = self.report_repo.bookings_in_range(start_date, end_date)?;
        let top_vehicle = self.report_repo.top_vehicle_in_range(start_date, end_date)?;

        Ok(RangeReport {
            start_date,
            end_date,
            bookings,
            top_vehicle,
        })
    }

    // ==========================================
    // 单车履历
    // ==========================================

    /// 车牌（支持 LIKE 通配）的服务履历
    pub fn history_for_vehicle(&self, plate_pattern: &str) -> RepositoryResult<VehicleHistory> {
        self.history_for_vehicle_from(Local::now().date_naive(), plate_pattern)
    }

    pub fn history_for_vehicle_from(
        &self,
        today: NaiveDate,
        plate_pattern: &str,
    ) -> RepositoryResult<VehicleHistory> {
        check_window("history_window_days", self.history_window_days)?;
        let since = shift_days(
            "history_window_days",
            today,
            -i64::from(self.history_window_days),
        )?;

        let bookings = self.report_repo.bookings_matching_plate(plate_pattern)?;
        let recent_count = self
            .report_repo
            .count_matching_plate_since(plate_pattern, since)?;
        let owner = self.report_repo.owner_matching_plate(plate_pattern)?;

        let (owner_name, owner_phone) = match owner {
            Some((name, phone)) => (Some(name), Some(phone)),
            None => (None, None),
        };

        Ok(VehicleHistory {
            bookings,
            recent_count,
            owner_name,
            owner_phone,
        })
    }

    // ==========================================
    // 品牌
    // ==========================================

    /// 指定品牌车辆在 [今天, 今天 + window_days] 内的预约（任意状态）
    pub fn bookings_for_brands(&self, brands: &[String], window_days: u32) -> RepositoryResult<Vec<Booking>> {
        self.bookings_for_brands_from(Local::now().date_naive(), brands, window_days)
    }

    pub fn bookings_for_brands_from(
        &self,
        today: NaiveDate,
        brands: &[String],
        window_days: u32,
    ) -> RepositoryResult<Vec<Booking>> {
        check_window("window_days", window_days)?;
        let until = shift_days("window_days", today, i64::from(window_days))?;
        self.report_repo.bookings_for_brands(brands, today, until)
    }
}
