// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 环境变量:
// - RUST_LOG: 级别过滤（默认 info）
// - FBA_REPLENISHMENT_LOG_FORMAT: 输出格式 (text / json，默认 text)
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 输出格式环境变量
pub const LOG_FORMAT_ENV: &str = "FBA_REPLENISHMENT_LOG_FORMAT";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人读文本（带行号）
    #[default]
    Text,
    /// JSON 行，供日志采集
    Json,
}

impl LogFormat {
    /// 解析格式名，未知取值回退 Text
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// 从 FBA_REPLENISHMENT_LOG_FORMAT 读取
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统（宿主程序启动时调用一次）
///
/// 格式由 FBA_REPLENISHMENT_LOG_FORMAT 决定
///
/// # 示例
/// ```no_run
/// use fba_replenishment::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::from_env());
}

/// 按指定格式初始化
///
/// 已有全局 subscriber 时忽略（宿主可能先行初始化）
pub fn init_with_format(format: LogFormat) {
    let result = match format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Json => fmt()
            .with_env_filter(env_filter())
            .json()
            .with_current_span(true)
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!(?format, "全局日志已初始化，跳过");
    }
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，重复调用无副作用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
