//! 日志初始化
//!
//! `tracing` + stderr 输出。级别由环境变量 `SFX_RENAMER_LOG` 指定（默认 `info`），
//! `--verbose` 时默认级别提升为 `debug`。
//!
//! ```bash
//! SFX_RENAMER_LOG=debug sfx-renamer rename ./sfx --dry-run
//! SFX_RENAMER_LOG=sfx_renamer_common=trace sfx-renamer classify "door slam"
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "SFX_RENAMER_LOG";

/// 过滤条件：环境变量优先
pub fn filter_directive(verbose: bool) -> String {
    match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ if verbose => "debug".to_string(),
        _ => "info".to_string(),
    }
}

/// 日志初始化，重复调用无副作用
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .or_else(|_| EnvFilter::try_new("info"))
        .context("日志过滤条件无效")?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // 已初始化（测试中多次调用）时忽略
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_ok() {
        assert!(init_logging(false).is_ok());
        assert!(init_logging(true).is_ok());
    }
}
