// ==========================================
// 汽车服务预约系统 - 预约配置
// ==========================================
// 默认值即生产口径；config_kv 表中的覆写由 ConfigManager 叠加
// ==========================================

use crate::domain::booking::{DEFAULT_BAY_COUNT, MAX_WINDOW_DAYS};
use crate::domain::types::OccupancyPolicy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "AUTOSERVICE_BOOKING_DB_PATH";

const DB_FILE_NAME: &str = "autoservice_booking.db";

// ==========================================
// BookingConfig - 预约核心配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// 数据库文件路径
    pub db_path: String,
    /// 开放的工位数量（工位号 1..=bay_count，不超过 DEFAULT_BAY_COUNT）
    pub bay_count: u32,
    /// 可预约日期的探测窗口（天）
    pub availability_window_days: u32,
    /// 品牌预约查询窗口（天）
    pub brand_window_days: u32,
    /// 单车履历的统计窗口（天）
    pub history_window_days: u32,
    /// 工位占用口径
    pub occupancy_policy: OccupancyPolicy,
    /// SQLite busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
    /// 状态名称语言
    pub locale: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            db_path: DB_FILE_NAME.to_string(),
            bay_count: DEFAULT_BAY_COUNT,
            availability_window_days: 30,
            brand_window_days: 30,
            history_window_days: 365,
            occupancy_policy: OccupancyPolicy::ActiveOnly,
            busy_timeout_ms: crate::db::DEFAULT_BUSY_TIMEOUT_MS,
            locale: "ru".to_string(),
        }
    }
}

impl BookingConfig {
    /// 默认配置 + 默认数据库路径
    pub fn from_env() -> Self {
        Self {
            db_path: Self::default_db_path(),
            ..Self::default()
        }
    }

    /// 默认数据库路径
    ///
    /// 优先级:
    /// 1. 环境变量 AUTOSERVICE_BOOKING_DB_PATH
    /// 2. 用户数据目录 / autoservice-booking / autoservice_booking.db
    /// 3. ./autoservice_booking.db
    pub fn default_db_path() -> String {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }

        let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));
        if let Some(data_dir) = dirs::data_dir() {
            let dir = data_dir.join("autoservice-booking");
            // 目录创建失败时退回当前目录
            if std::fs::create_dir_all(&dir).is_ok() {
                path = dir.join(DB_FILE_NAME);
            }
        }

        path.to_string_lossy().to_string()
    }

    /// 校验配置
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.bay_count == 0 || self.bay_count > DEFAULT_BAY_COUNT {
            return Err(config_error(
                "bay_count",
                &format!("工位数量必须在 1..={} 之间: {}", DEFAULT_BAY_COUNT, self.bay_count),
            ));
        }

        let windows = [
            ("availability_window_days", self.availability_window_days),
            ("brand_window_days", self.brand_window_days),
            ("history_window_days", self.history_window_days),
        ];
        for (key, days) in windows {
            if days == 0 || days > MAX_WINDOW_DAYS {
                return Err(config_error(
                    key,
                    &format!("窗口天数必须在 1..={} 之间: {}", MAX_WINDOW_DAYS, days),
                ));
            }
        }
        Ok(())
    }
}

fn config_error(key: &str, message: &str) -> RepositoryError {
    RepositoryError::ConfigError {
        key: key.to_string(),
        message: message.to_string(),
    }
}
