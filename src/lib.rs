// ==========================================
// 汽车服务预约系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 预约持久化与工位调度核心（展示层由外部调用）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 组件组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use app::AppState;
pub use config::{BookingConfig, ConfigManager};
pub use domain::{
    AllocationOutcome, Booking, BookingOverview, BookingStatus, Customer, CustomerWithVehicles,
    NewCustomer, OccupancyPolicy, RangeReport, RegisterOutcome, Vehicle, VehicleHistory,
    VehicleWithOwner,
};
pub use engine::{AvailabilityCalculator, BookingAllocator, LifecycleManager, ReportingViews};
pub use repository::{RepositoryError, RepositoryResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "汽车服务预约系统";
