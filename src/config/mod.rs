// ==========================================
// 汽车服务预约系统 - 配置层
// ==========================================
// 职责: 预约核心配置（默认值 + config_kv 覆写）
// ==========================================

pub mod booking_config;
pub mod config_manager;

// 重导出
pub use booking_config::{BookingConfig, DB_PATH_ENV};
pub use config_manager::{config_keys, ConfigManager};
