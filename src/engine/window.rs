// ==========================================
// 汽车服务预约系统 - 日期窗口计算
// ==========================================
// 窗口天数来自调用方或配置，越界或日期溢出返回 FieldValueError
// ==========================================

use crate::domain::booking::MAX_WINDOW_DAYS;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Duration, NaiveDate};

/// 校验窗口天数不超过 MAX_WINDOW_DAYS
pub fn check_window(field: &str, window_days: u32) -> RepositoryResult<()> {
    if window_days > MAX_WINDOW_DAYS {
        return Err(RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("窗口天数 {} 超过上限 {}", window_days, MAX_WINDOW_DAYS),
        });
    }
    Ok(())
}

/// `date` 平移 `days` 天（可为负），超出日历范围时报错
pub fn shift_days(field: &str, date: NaiveDate, days: i64) -> RepositoryResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("{} 平移 {} 天超出日期范围", date, days),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_window_bounds() {
        assert!(check_window("window_days", 0).is_ok());
        assert!(check_window("window_days", MAX_WINDOW_DAYS).is_ok());

        let err = check_window("window_days", u32::MAX).unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "window_days"));
    }

    #[test]
    fn test_shift_days_overflow_is_error() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            shift_days("d", day, 30).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
        assert_eq!(
            shift_days("d", day, -365).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );

        assert!(shift_days("d", day, i64::from(u32::MAX)).is_err());
        assert!(shift_days("d", NaiveDate::MAX, 1).is_err());
        assert!(shift_days("d", NaiveDate::MIN, -1).is_err());
    }
}
