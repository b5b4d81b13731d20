use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info。
/// 重复调用时静默忽略（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("startup_report={},warn", default_level)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
