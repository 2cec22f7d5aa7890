// ==========================================
// 汽车服务预约系统 - 引擎层
// ==========================================
// 职责: 实现业务规则（可用性、工位分配、生命周期、报表）
// 红线: Engine 不拼 SQL
// ==========================================

pub mod allocator;
pub mod availability;
pub mod lifecycle;
pub mod reporting;
pub mod window;

// 重导出核心引擎
pub use allocator::{lowest_free_bay, parse_booking_date, BookingAllocator};
pub use availability::AvailabilityCalculator;
pub use lifecycle::LifecycleManager;
pub use reporting::ReportingViews;
