// ==========================================
// 汽车服务预约系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod booking;
pub mod customer;
pub mod report;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use booking::{AllocationOutcome, Booking, BookingOverview, DEFAULT_BAY_COUNT, MAX_WINDOW_DAYS};
pub use customer::{Customer, CustomerWithVehicles, NewCustomer, RegisterOutcome};
pub use report::{RangeBookingRow, RangeReport, TopVehicle, VehicleBookingCount, VehicleHistory};
pub use types::{BookingStatus, OccupancyPolicy};
pub use vehicle::{Vehicle, VehicleWithOwner};
