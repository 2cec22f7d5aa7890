// ==========================================
// 汽车服务预约系统 - 应用状态
// ==========================================
// 职责: 管理共享连接与全部仓储/引擎实例
// 约定: 所有组件注入同一个 SharedConnection，按操作加锁获取
// ==========================================

use std::sync::Arc;

use crate::config::{BookingConfig, ConfigManager};
use crate::db::{self, SharedConnection};
use crate::engine::{AvailabilityCalculator, BookingAllocator, LifecycleManager, ReportingViews};
use crate::repository::{
    BookingRepository, CustomerRepository, RepositoryError, RepositoryResult, ReportRepository,
    VehicleRepository,
};

/// 应用状态
///
/// 外部展示层（聊天机器人等）持有一个实例，所有调用共享同一个连接
pub struct AppState {
    /// 生效配置（默认值 + config_kv 覆写）
    pub config: BookingConfig,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 客户仓储
    pub customer_repo: Arc<CustomerRepository>,

    /// 车辆仓储
    pub vehicle_repo: Arc<VehicleRepository>,

    /// 预约仓储
    pub booking_repo: Arc<BookingRepository>,

    /// 工位可用性
    pub availability: Arc<AvailabilityCalculator>,

    /// 工位分配
    pub allocator: Arc<BookingAllocator>,

    /// 预约生命周期
    pub lifecycle: Arc<LifecycleManager>,

    /// 统计报表
    pub reporting: Arc<ReportingViews>,

    conn: SharedConnection,
}

impl AppState {
    /// 按数据库路径创建（其余配置取默认值 + config_kv 覆写）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        Self::from_config(BookingConfig {
            db_path: db_path.to_string(),
            ..BookingConfig::default()
        })
    }

    /// 按配置创建: 打开连接 → 建表 → 叠加覆写 → 组装组件
    pub fn from_config(config: BookingConfig) -> RepositoryResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        let conn = db::open_sqlite_connection_with_timeout(&config.db_path, config.busy_timeout_ms)
            .map_err(|e| RepositoryError::DatabaseQueryError(format!("无法打开数据库: {}", e)))?;
        db::ensure_schema(&conn)?;

        Self::from_connection(db::into_shared(conn), config)
    }

    /// 从已建表的共享连接创建
    pub fn from_connection(conn: SharedConnection, base: BookingConfig) -> RepositoryResult<Self> {
        let config_manager = Arc::new(ConfigManager::new(conn.clone()));
        let mut config = config_manager.load_booking_config(base)?;
        config.locale = crate::i18n::set_locale(&config.locale).to_string();

        let customer_repo = Arc::new(CustomerRepository::new(conn.clone()));
        let vehicle_repo = Arc::new(VehicleRepository::new(conn.clone()));
        let booking_repo = Arc::new(BookingRepository::new(conn.clone()));
        let report_repo = Arc::new(ReportRepository::new(conn.clone()));

        let availability = Arc::new(AvailabilityCalculator::new(
            booking_repo.clone(),
            config.bay_count,
            config.occupancy_policy,
        ));
        let allocator = Arc::new(BookingAllocator::new(
            booking_repo.clone(),
            config.bay_count,
            config.occupancy_policy,
        ));
        let lifecycle = Arc::new(LifecycleManager::new(booking_repo.clone()));
        let reporting = Arc::new(ReportingViews::new(report_repo, config.history_window_days));

        tracing::info!(
            "AppState初始化成功: bay_count={}, occupancy_policy={}",
            config.bay_count,
            config.occupancy_policy
        );

        Ok(Self {
            config,
            config_manager,
            customer_repo,
            vehicle_repo,
            booking_repo,
            availability,
            allocator,
            lifecycle,
            reporting,
            conn,
        })
    }

    /// 内存库（测试与演示）
    pub fn in_memory(base: BookingConfig) -> RepositoryResult<Self> {
        let conn = db::open_in_memory()?;
        Self::from_connection(db::into_shared(conn), base)
    }

    /// 共享连接句柄
    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    /// 默认窗口内的可预约日期
    pub fn available_dates(&self) -> RepositoryResult<Vec<chrono::NaiveDate>> {
        self.availability
            .list_available_dates(self.config.availability_window_days)
    }

    /// 默认窗口内指定品牌的预约
    pub fn bookings_for_brands(&self, brands: &[String]) -> RepositoryResult<Vec<crate::domain::Booking>> {
        self.reporting
            .bookings_for_brands(brands, self.config.brand_window_days)
    }
}
