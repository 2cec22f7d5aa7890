// ==========================================
// 展示文案 (rust-i18n)
// ==========================================
// locales/ru.yml 为默认语言，locales/en.yml 为备用
// i18n! 宏在 lib.rs 中注册
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "ru";

/// 已提供文案的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["ru", "en"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 切换语言，未提供文案的语言回退到默认语言
///
/// 返回实际生效的语言
pub fn set_locale(locale: &str) -> &'static str {
    let applied = SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| *l == locale.trim())
        .unwrap_or_else(|| {
            tracing::warn!("不支持的语言 {:?}，回退到 {}", locale, DEFAULT_LOCALE);
            DEFAULT_LOCALE
        });
    rust_i18n::set_locale(applied);
    applied
}

/// 按键取文案，例如 `t("booking_status.scheduled")`
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}
