// ==========================================
// 汽车服务预约系统 - 预约生命周期管理
// ==========================================
// 状态机:
//   scheduled → in_progress → completed
//   scheduled / in_progress → cancelled
// cancel / complete: 无条件覆写（不读当前状态，重复调用幂等）
// start_work / transition: 校验源状态，非法迁移返回 InvalidStateTransition
// ==========================================

use crate::domain::booking::{Booking, BookingOverview};
use crate::domain::types::BookingStatus;
use crate::repository::booking_repo::{BookingOrder, BookingRepository, StatusFilter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::Arc;

// ==========================================
// LifecycleManager - 生命周期管理器
// ==========================================
pub struct LifecycleManager {
    booking_repo: Arc<BookingRepository>,
}

impl LifecycleManager {
    pub fn new(booking_repo: Arc<BookingRepository>) -> Self {
        Self { booking_repo }
    }

    // ==========================================
    // 状态迁移
    // ==========================================

    /// 取消预约（无条件覆写为 cancelled）
    ///
    /// # 返回
    /// - Ok(true): 已写入
    /// - Ok(false): 预约不存在
    pub fn cancel(&self, booking_id: i64) -> RepositoryResult<bool> {
        let updated = self
            .booking_repo
            .update_status(booking_id, BookingStatus::Cancelled)?;
        tracing::info!("取消预约: id={}, updated={}", booking_id, updated);
        Ok(updated)
    }

    /// 完成预约（无条件覆写为 completed）
    pub fn complete(&self, booking_id: i64) -> RepositoryResult<bool> {
        let updated = self
            .booking_repo
            .update_status(booking_id, BookingStatus::Completed)?;
        tracing::info!("完成预约: id={}, updated={}", booking_id, updated);
        Ok(updated)
    }

    /// 开始施工（仅允许 scheduled → in_progress）
    pub fn start_work(&self, booking_id: i64) -> RepositoryResult<bool> {
        self.transition(booking_id, BookingStatus::InProgress)
    }

    /// 严格状态迁移（校验源状态）
    ///
    /// # 返回
    /// - Ok(true): 已迁移
    /// - Ok(false): 预约不存在
    /// - Err(InvalidStateTransition): 非法迁移，状态不变
    pub fn transition(&self, booking_id: i64, target: BookingStatus) -> RepositoryResult<bool> {
        let previous = self
            .booking_repo
            .transition_status(booking_id, target, |current| {
                if current.can_transition_to(target) {
                    Ok(())
                } else {
                    Err(RepositoryError::InvalidStateTransition {
                        from: current.to_string(),
                        to: target.to_string(),
                    })
                }
            })?;

        match previous {
            Some(from) => {
                tracing::info!("预约状态迁移: id={}, {} → {}", booking_id, from, target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 物理删除预约（绕过生命周期）
    pub fn delete(&self, booking_id: i64) -> RepositoryResult<bool> {
        let deleted = self.booking_repo.delete(booking_id)?;
        tracing::info!("删除预约: id={}, deleted={}", booking_id, deleted);
        Ok(deleted)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn get_by_id(&self, booking_id: i64) -> RepositoryResult<Option<Booking>> {
        self.booking_repo.find_by_id(booking_id)
    }

    /// 按状态过滤的预约列表
    pub fn list_by_status(
        &self,
        filter: &StatusFilter,
        order: BookingOrder,
    ) -> RepositoryResult<Vec<BookingOverview>> {
        self.booking_repo.list_overviews(filter, order)
    }

    /// 有效预约: 施工中在前，再按日期升序
    pub fn list_active(&self) -> RepositoryResult<Vec<BookingOverview>> {
        self.list_by_status(
            &StatusFilter::AnyOf(BookingStatus::ACTIVE.to_vec()),
            BookingOrder::StatusPriorityThenDate,
        )
    }

    /// 未结束预约（非取消、非完成），按日期升序
    pub fn list_all_open(&self) -> RepositoryResult<Vec<BookingOverview>> {
        self.list_by_status(
            &StatusFilter::NoneOf(BookingStatus::TERMINAL.to_vec()),
            BookingOrder::Date,
        )
    }

    /// 仅 scheduled，按日期升序
    pub fn list_scheduled_only(&self) -> RepositoryResult<Vec<BookingOverview>> {
        self.list_by_status(
            &StatusFilter::AnyOf(vec![BookingStatus::Scheduled]),
            BookingOrder::Date,
        )
    }
}
