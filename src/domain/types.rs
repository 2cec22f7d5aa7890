// ==========================================
// 汽车服务预约系统 - 领域类型定义
// ==========================================
// 预约状态机:
//   scheduled → in_progress → completed
//   scheduled / in_progress → cancelled
// completed / cancelled 为终态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 预约状态 (Booking Status)
// ==========================================
// 序列化格式: snake_case (与数据库 CHECK 约束一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,  // 已预约
    InProgress, // 施工中
    Completed,  // 已完成
    Cancelled,  // 已取消
}

impl BookingStatus {
    /// 占用工位的状态集合
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Scheduled, BookingStatus::InProgress];

    /// 终态集合
    pub const TERMINAL: [BookingStatus; 2] = [BookingStatus::Completed, BookingStatus::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s.trim() {
            "scheduled" => Some(BookingStatus::Scheduled),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// 是否占用工位
    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    /// 是否允许迁移到目标状态
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        matches!(
            (self, target),
            (BookingStatus::Scheduled, BookingStatus::InProgress)
                | (BookingStatus::InProgress, BookingStatus::Completed)
                | (BookingStatus::Scheduled, BookingStatus::Cancelled)
                | (BookingStatus::InProgress, BookingStatus::Cancelled)
        )
    }

    /// 面向用户的状态名称（按当前 locale 翻译）
    pub fn label(&self) -> String {
        crate::i18n::t(&format!("booking_status.{}", self.as_str()))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl rusqlite::ToSql for BookingStatus {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
    }
}

impl rusqlite::types::FromSql for BookingStatus {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let raw = value.as_str()?;
        BookingStatus::parse(raw).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("未知预约状态: {}", raw).into())
        })
    }
}

// ==========================================
// 工位占用口径 (Occupancy Policy)
// ==========================================
// ActiveOnly: 仅 scheduled / in_progress 占用工位（默认）
// LegacyAllRows: 当日所有记录都占用工位（含已取消、已完成）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyPolicy {
    #[default]
    ActiveOnly,
    LegacyAllRows,
}

impl OccupancyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyPolicy::ActiveOnly => "ACTIVE_ONLY",
            OccupancyPolicy::LegacyAllRows => "LEGACY_ALL_ROWS",
        }
    }

    pub fn parse(s: &str) -> Option<OccupancyPolicy> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE_ONLY" => Some(OccupancyPolicy::ActiveOnly),
            "LEGACY_ALL_ROWS" => Some(OccupancyPolicy::LegacyAllRows),
            _ => None,
        }
    }
}

impl fmt::Display for OccupancyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
