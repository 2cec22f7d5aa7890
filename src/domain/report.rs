// ==========================================
// 汽车服务预约系统 - 统计报表模型
// ==========================================
// 只读视图，不参与写入
// ==========================================

use crate::domain::booking::Booking;
use crate::domain::types::BookingStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 车辆预约次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleBookingCount {
    pub plate: String,
    pub count: i64,
}

/// 区间报表中的单条预约
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBookingRow {
    pub booking_id: i64,
    pub date: NaiveDate,
    pub status: BookingStatus,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub owner_name: String,
    pub owner_phone: String,
}

/// 区间内预约最多的车辆（不含已取消）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopVehicle {
    pub plate: String,
    pub count: i64,
    pub brand: String,
    pub model: String,
    pub owner_name: String,
    pub owner_phone: String,
}

/// 日期区间报表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bookings: Vec<RangeBookingRow>,
    pub top_vehicle: Option<TopVehicle>,
}

/// 单车服务履历
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleHistory {
    pub bookings: Vec<Booking>,
    /// 近一年（不含已取消）的预约次数
    pub recent_count: i64,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
}
