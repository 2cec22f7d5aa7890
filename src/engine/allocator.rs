// ==========================================
// 汽车服务预约系统 - 工位分配引擎
// ==========================================
// 规则:
// 1) 规范化日期（去掉调用方误带的 "date:" 前缀）
// 2) 读取当日已占工位
// 3) 已占 >= 工位总数 → NoCapacity，不写入
// 4) 取最小空闲工位号（确定性，从 1 开始）
// 5) 写入 scheduled 预约
// 并发: 2~5 在同一个 BEGIN IMMEDIATE 事务中完成；
//       部分唯一索引冲突时重新计算，最多 MAX_ALLOCATION_ATTEMPTS 次
// ==========================================

use crate::domain::booking::AllocationOutcome;
use crate::domain::types::OccupancyPolicy;
use crate::repository::booking_repo::{BookingRepository, NewBooking};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

/// 调用方可能误带的日期前缀
pub const DATE_PREFIX: &str = "date:";

/// 唯一索引冲突后的最大尝试次数
pub const MAX_ALLOCATION_ATTEMPTS: usize = 3;

// ==========================================
// BookingAllocator - 工位分配引擎
// ==========================================
pub struct BookingAllocator {
    booking_repo: Arc<BookingRepository>,
    bay_count: u32,
    policy: OccupancyPolicy,
}

impl BookingAllocator {
    pub fn new(booking_repo: Arc<BookingRepository>, bay_count: u32, policy: OccupancyPolicy) -> Self {
        Self {
            booking_repo,
            bay_count,
            policy,
        }
    }

    /// 按调用方原始日期字符串创建预约
    ///
    /// # 参数
    /// - `raw_date`: "YYYY-MM-DD"，允许带 "date:" 前缀
    /// - `plate`: 车牌号
    /// - `description`: 服务描述
    ///
    /// # 返回
    /// - Ok(Allocated): 已写入
    /// - Ok(NoCapacity): 当日已满
    /// - Err(FieldValueError): 日期无法解析（不写入）
    pub fn create_booking(
        &self,
        raw_date: &str,
        plate: &str,
        description: &str,
    ) -> RepositoryResult<AllocationOutcome> {
        let date = parse_booking_date(raw_date)?;
        self.allocate(date, plate, description)
    }

    /// 为指定日期分配最小空闲工位并写入预约
    #[instrument(skip(self, description), fields(bay_count = self.bay_count, policy = %self.policy))]
    pub fn allocate(
        &self,
        date: NaiveDate,
        plate: &str,
        description: &str,
    ) -> RepositoryResult<AllocationOutcome> {
        let new_booking = NewBooking {
            plate: plate.to_string(),
            date,
            description: description.to_string(),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            let bay_count = self.bay_count;
            let result = self
                .booking_repo
                .insert_with_bay_selection(&new_booking, self.policy, |taken| {
                    lowest_free_bay(taken, bay_count)
                });

            match result {
                Ok(Some(booking)) => {
                    tracing::info!(
                        "预约成功: id={}, plate={}, date={}, bay={}",
                        booking.id,
                        booking.plate,
                        booking.date,
                        booking.bay_number
                    );
                    return Ok(AllocationOutcome::Allocated(booking));
                }
                Ok(None) => {
                    tracing::warn!("工位已满: date={}, plate={}", date, plate);
                    return Ok(AllocationOutcome::NoCapacity);
                }
                Err(e) if e.is_unique_violation() && attempt < MAX_ALLOCATION_ATTEMPTS => {
                    tracing::warn!(
                        "工位被并发占用，重新计算: date={}, attempt={}, err={}",
                        date,
                        attempt,
                        e
                    );
                }
                Err(e) => {
                    tracing::error!("预约写入失败: date={}, plate={}, err={}", date, plate, e);
                    return Err(e);
                }
            }
        }
    }
}

/// 最小空闲工位号（工位池 1..=bay_count）
pub fn lowest_free_bay(taken: &BTreeSet<u32>, bay_count: u32) -> Option<u32> {
    (1..=bay_count).find(|bay| !taken.contains(bay))
}

/// 规范化并解析预约日期
///
/// 去掉首尾空白与 "date:" 前缀后按 YYYY-MM-DD 解析
pub fn parse_booking_date(raw: &str) -> RepositoryResult<NaiveDate> {
    let trimmed = raw.trim();
    let normalized = trimmed.strip_prefix(DATE_PREFIX).unwrap_or(trimmed).trim();

    NaiveDate::parse_from_str(normalized, "%Y-%m-%d").map_err(|e| RepositoryError::FieldValueError {
        field: "date".to_string(),
        message: format!("无法解析日期 {:?}: {}", raw, e),
    })
}
