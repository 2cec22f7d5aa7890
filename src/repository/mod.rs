// ==========================================
// 汽车服务预约系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 所有仓储共享同一个注入的连接句柄
// ==========================================

pub mod booking_repo;
pub mod customer_repo;
pub mod error;
pub mod report_repo;
pub mod sql_utils;
pub mod vehicle_repo;

// 重导出核心仓储
pub use booking_repo::{BookingOrder, BookingRepository, NewBooking, StatusFilter};
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use report_repo::ReportRepository;
pub use vehicle_repo::VehicleRepository;
