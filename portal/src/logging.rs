//! ログ初期化
//!
//! 標準出力への整形ログと、ログディレクトリ指定時の日次ローテーションJSONログ。

use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログレベルを指定する環境変数（`RUST_LOG` が優先）
pub const LOG_LEVEL_ENV: &str = "PORTAL_LOG_LEVEL";

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ログファイル名の接頭辞
pub const LOG_FILE_PREFIX: &str = "portal.log";

/// グローバルなサブスクライバーを設定する
///
/// 返り値のガードは書き込みスレッドを保持するため、プロセス終了まで保持すること。
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(LOG_LEVEL_ENV).ok();
        EnvFilter::try_new(level_directive(level.as_deref()))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    });

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn level_directive(level: Option<&str>) -> &str {
    match level.map(str::trim) {
        Some(level) if !level.is_empty() => level,
        _ => DEFAULT_LOG_LEVEL,
    }
}
