// ==========================================
// 汽车服务预约系统 - 预约领域模型
// ==========================================
// 粒度: 按自然日预约，无时段
// 约束: 工位号取自固定池 {1..=5}，配置只能关闭部分工位，不能扩容
// 写入: 仅由 BookingAllocator 创建，仅由 LifecycleManager 改状态
// ==========================================

use crate::domain::types::BookingStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 工位池大小（物理工位数，亦为 bay_count 上限）
pub const DEFAULT_BAY_COUNT: u32 = 5;

/// 日期窗口参数（可预约、品牌、履历）的上限（天）
pub const MAX_WINDOW_DAYS: u32 = 3_660;

// ==========================================
// Booking - 预约
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,                // 代理主键
    pub plate: String,          // 车牌号 → vehicles.plate
    pub date: NaiveDate,        // 预约日期
    pub bay_number: u32,        // 工位号
    pub description: String,    // 服务描述
    pub status: BookingStatus,  // 状态
}

/// 预约列表视图（预约 + 车辆 + 车主）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOverview {
    pub booking_id: i64,
    pub date: NaiveDate,
    pub bay_number: u32,
    pub description: String,
    pub status: BookingStatus,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_handle: Option<String>,
}

/// 工位分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// 分配成功
    Allocated(Booking),
    /// 当日工位已满，未写入任何记录
    NoCapacity,
}

impl AllocationOutcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated(_))
    }

    pub fn booking(&self) -> Option<&Booking> {
        match self {
            AllocationOutcome::Allocated(booking) => Some(booking),
            AllocationOutcome::NoCapacity => None,
        }
    }
}
