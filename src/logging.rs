//! 日誌初始化
//!
//! 使用 tracing 和 tracing-subscriber，日誌級別由 RUST_LOG 控制。

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// RUST_LOG 未設定時預設為 info，例如 `RUST_LOG=forecast_calc=debug`。
///
/// ```no_run
/// forecast_planning::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 測試用日誌（debug 級別，可重複呼叫）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
