// ==========================================
// 汽车服务预约系统 - 配置管理器
// ==========================================
// 职责: 配置覆写的读取、写入、快照
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::config::booking_config::BookingConfig;
use crate::db::SharedConnection;
use crate::domain::types::OccupancyPolicy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 工位
    pub const BAY_COUNT: &str = "bay_count";
    pub const OCCUPANCY_POLICY: &str = "occupancy_policy";

    // 查询窗口
    pub const AVAILABILITY_WINDOW_DAYS: &str = "availability_window_days";
    pub const BRAND_WINDOW_DAYS: &str = "brand_window_days";
    pub const HISTORY_WINDOW_DAYS: &str = "history_window_days";

    // 展示
    pub const LOCALE: &str = "locale";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: SharedConnection,
}

impl ConfigManager {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!("配置已更新: {}={}", key, value);
        Ok(())
    }

    /// 在基础配置上叠加 config_kv 中的覆写，并校验
    pub fn load_booking_config(&self, base: BookingConfig) -> RepositoryResult<BookingConfig> {
        let mut config = base;

        if let Some(v) = self.get_parsed::<u32>(config_keys::BAY_COUNT)? {
            config.bay_count = v;
        }
        if let Some(v) = self.get_parsed::<u32>(config_keys::AVAILABILITY_WINDOW_DAYS)? {
            config.availability_window_days = v;
        }
        if let Some(v) = self.get_parsed::<u32>(config_keys::BRAND_WINDOW_DAYS)? {
            config.brand_window_days = v;
        }
        if let Some(v) = self.get_parsed::<u32>(config_keys::HISTORY_WINDOW_DAYS)? {
            config.history_window_days = v;
        }
        if let Some(raw) = self.get_value(config_keys::OCCUPANCY_POLICY)? {
            config.occupancy_policy =
                OccupancyPolicy::parse(&raw).ok_or_else(|| RepositoryError::ConfigError {
                    key: config_keys::OCCUPANCY_POLICY.to_string(),
                    message: format!("无法识别的占用口径: {}", raw),
                })?;
        }
        if let Some(v) = self.get_value(config_keys::LOCALE)? {
            config.locale = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// 全部覆写项的 JSON 快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map)).map_err(|e| RepositoryError::ConfigError {
            key: "*".to_string(),
            message: e.to_string(),
        })
    }

    fn get_parsed<T: FromStr>(&self, key: &str) -> RepositoryResult<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        match self.get_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| RepositoryError::ConfigError {
                    key: key.to_string(),
                    message: format!("值 {} 无法解析: {}", raw, e),
                }),
            None => Ok(None),
        }
    }
}
