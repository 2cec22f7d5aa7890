// ==========================================
// 汽车服务预约系统 - 工位可用性计算
// ==========================================
// 职责: 计算某日已占用工位数，判断是否仍有余量
// 口径: OccupancyPolicy（默认仅有效预约占用工位）
// ==========================================

use crate::domain::types::OccupancyPolicy;
use crate::repository::booking_repo::BookingRepository;
use crate::engine::window::{check_window, shift_days};
use crate::repository::error::RepositoryResult;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

// ==========================================
// AvailabilityCalculator - 工位可用性计算器
// ==========================================
pub struct AvailabilityCalculator {
    booking_repo: Arc<BookingRepository>,
    bay_count: u32,
    policy: OccupancyPolicy,
}

impl AvailabilityCalculator {
    pub fn new(booking_repo: Arc<BookingRepository>, bay_count: u32, policy: OccupancyPolicy) -> Self {
        Self {
            booking_repo,
            bay_count,
            policy,
        }
    }

    pub fn bay_count(&self) -> u32 {
        self.bay_count
    }

    pub fn policy(&self) -> OccupancyPolicy {
        self.policy
    }

    /// 某日已占用的不同工位数
    pub fn occupied_bays(&self, date: NaiveDate) -> RepositoryResult<usize> {
        Ok(self.booking_repo.occupied_bays(date, self.policy)?.len())
    }

    /// 某日剩余工位数
    pub fn free_bays(&self, date: NaiveDate) -> RepositoryResult<u32> {
        let occupied = self.occupied_bays(date)? as u32;
        Ok(self.bay_count.saturating_sub(occupied))
    }

    /// 某日是否仍有可用工位（已占用数 < 工位总数）
    pub fn capacity_remaining(&self, date: NaiveDate) -> RepositoryResult<bool> {
        Ok((self.occupied_bays(date)? as u32) < self.bay_count)
    }

    /// 从今天起 `window_days` 天内可预约的日期
    pub fn list_available_dates(&self, window_days: u32) -> RepositoryResult<Vec<NaiveDate>> {
        self.list_available_dates_from(Local::now().date_naive(), window_days)
    }

    /// 从 `today` 起逐日探测，返回仍有余量的日期（升序）
    pub fn list_available_dates_from(
        &self,
        today: NaiveDate,
        window_days: u32,
    ) -> RepositoryResult<Vec<NaiveDate>> {
        check_window("window_days", window_days)?;

        let mut dates = Vec::new();
        for offset in 0..window_days {
            let date = shift_days("window_days", today, i64::from(offset))?;
            if self.capacity_remaining(date)? {
                dates.push(date);
            }
        }

        tracing::debug!(
            "可预约日期探测完成: from={}, window={}, available={}",
            today,
            window_days,
            dates.len()
        );
        Ok(dates)
    }
}
