//! Realm Portal Server Entry Point

use anyhow::Context;
use clap::Parser;
use realm_portal::accounts::SqliteAccountStore;
use realm_portal::captcha::{ChallengeIssuer, ExpiringTokenStore};
use realm_portal::cli::Cli;
use realm_portal::health::{LivenessMonitor, TcpProbe};
use realm_portal::shutdown::ShutdownController;
use realm_portal::{api, db, logging, server, AppState};
use realm_portal_common::config::PortalConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// `.env` の読み込みを抑止する環境名
const PRODUCTION_ENV: &str = "production";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.log_dir.as_deref())?;
    let config = load_config(&cli)?;

    run_server(config).await
}

fn load_dotenv() {
    if std::env::var("PORTAL_ENV").as_deref() != Ok(PRODUCTION_ENV) {
        dotenvy::dotenv().ok();
    }
}

/// 設定ファイル・環境変数を読み込み、CLI引数で上書きする
fn load_config(cli: &Cli) -> anyhow::Result<PortalConfig> {
    let mut config =
        PortalConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    Ok(config)
}

async fn run_server(config: PortalConfig) -> anyhow::Result<()> {
    info!("Realm Portal v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    let accounts = SqliteAccountStore::new(pool);

    let shutdown = ShutdownController::default();

    let captcha_store = ExpiringTokenStore::new();
    let sweeper = captcha_store.spawn_sweeper(config.captcha_sweep_interval(), shutdown.clone());
    let issuer = ChallengeIssuer::new(captcha_store, config.captcha_ttl());

    let monitor = LivenessMonitor::new(Arc::new(TcpProbe))
        .with_interval(config.poll_interval())
        .with_timeout(config.probe_timeout())
        .with_shutdown(shutdown.clone());
    for endpoint in &config.endpoints {
        monitor
            .register(endpoint.clone())
            .await
            .with_context(|| format!("Failed to register endpoint {}", endpoint.id))?;
    }
    monitor.start().await;

    let state = AppState {
        status_table: monitor.status_table(),
        captcha: issuer,
        accounts: Arc::new(accounts),
    };
    let app = api::create_app(state, &config.static_files_path);

    let result = server::run(app, &config.bind_addr(), shutdown.clone()).await;

    // サーバーが異常終了した場合もバックグラウンドタスクを止める
    monitor.shutdown().await;
    if let Err(err) = sweeper.await {
        warn!(error = %err, "Captcha sweeper task failed");
    }

    result
}
