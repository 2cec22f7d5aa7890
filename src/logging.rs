// ==========================================
// 日志系统初始化
// ==========================================
// tracing-subscriber，级别由 RUST_LOG 控制
// 展示层（聊天机器人进程）启动时调用一次
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤器：本库 info，其余 warn
pub const DEFAULT_FILTER: &str = "warn,autoservice_booking=info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读（终端）
    #[default]
    Pretty,
    /// JSON 行（日志采集）
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// RUST_LOG 优先，未设置或无法解析时使用 `default_directive`
pub fn env_filter_or(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// 初始化日志系统（可读格式）
///
/// # 示例
/// ```no_run
/// use autoservice_booking::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with(LogFormat::Pretty);
}

/// 按指定格式初始化；重复调用时保留首次安装的 subscriber
pub fn init_with(format: LogFormat) {
    let filter = env_filter_or(DEFAULT_FILTER);
    let result = match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).with_target(true).try_init(),
    };

    if result.is_err() {
        tracing::debug!("日志系统已初始化，忽略重复调用: {:?}", format);
    }
}

/// 测试用：debug 级别写入测试输出，可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" text "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test();
        init_with(LogFormat::Json);
        init_with(LogFormat::Pretty);
    }
}
