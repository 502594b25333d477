//! 設定管理
//!
//! PortalConfig（既定値 → 設定ファイル → 環境変数 `PORTAL_*` の順で上書き）

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// 環境変数のプレフィックス
pub const ENV_PREFIX: &str = "PORTAL";

/// 監視対象エンドポイント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitoredEndpoint {
    /// 識別子（`/status/:id` のパスに使われる）
    pub id: String,
    /// ホスト名
    pub host: String,
    /// ポート番号
    pub port: u16,
}

impl MonitoredEndpoint {
    /// 新しい監視対象を作成
    pub fn new(id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
        }
    }
}

/// ポータル設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortalConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 80)
    #[serde(default = "default_port")]
    pub port: u16,

    /// データベースURL (デフォルト: "sqlite://portal.db")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// 静的ファイルのルート (デフォルト: "public")
    #[serde(default = "default_static_files_path")]
    pub static_files_path: String,

    /// ポーリング間隔（ミリ秒）(デフォルト: 3000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// TCPプローブのタイムアウト（ミリ秒）(デフォルト: 3000)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// キャプチャの有効期限（ミリ秒）(デフォルト: 600000)
    #[serde(default = "default_captcha_ttl_ms")]
    pub captcha_ttl_ms: u64,

    /// 期限切れキャプチャの掃除間隔（ミリ秒）(デフォルト: 60000)
    #[serde(default = "default_captcha_sweep_interval_ms")]
    pub captcha_sweep_interval_ms: u64,

    /// 監視対象 (デフォルト: login=localhost:2106, game=localhost:7777)
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<MonitoredEndpoint>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_database_url() -> String {
    "sqlite://portal.db".to_string()
}

fn default_static_files_path() -> String {
    "public".to_string()
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

fn default_captcha_ttl_ms() -> u64 {
    10 * 60 * 1000
}

fn default_captcha_sweep_interval_ms() -> u64 {
    60 * 1000
}

fn default_endpoints() -> Vec<MonitoredEndpoint> {
    vec![
        MonitoredEndpoint::new("login", "localhost", 2106),
        MonitoredEndpoint::new("game", "localhost", 7777),
    ]
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            static_files_path: default_static_files_path(),
            poll_interval_ms: default_poll_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            captcha_ttl_ms: default_captcha_ttl_ms(),
            captcha_sweep_interval_ms: default_captcha_sweep_interval_ms(),
            endpoints: default_endpoints(),
        }
    }
}

impl PortalConfig {
    /// 設定を読み込む
    ///
    /// `path` が指定されていれば拡張子から形式を判定して読み込み、
    /// その後 `PORTAL_*` 環境変数で上書きする。
    pub fn load(path: Option<&Path>) -> Result<Self, CommonError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: PortalConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 値の整合性を検証
    pub fn validate(&self) -> Result<(), CommonError> {
        if self.poll_interval_ms == 0 {
            return Err(CommonError::Validation(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(CommonError::Validation(
                "probe_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.captcha_ttl_ms == 0 || self.captcha_sweep_interval_ms == 0 {
            return Err(CommonError::Validation(
                "captcha ttl and sweep interval must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.id.trim().is_empty() {
                return Err(CommonError::Validation(
                    "endpoint id must not be empty".to_string(),
                ));
            }
            if !seen.insert(endpoint.id.as_str()) {
                return Err(CommonError::Validation(format!(
                    "duplicate endpoint id: {}",
                    endpoint.id
                )));
            }
        }

        Ok(())
    }

    /// バインドアドレス（host:port）
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ポーリング間隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// プローブのタイムアウト
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// キャプチャの有効期限
    pub fn captcha_ttl(&self) -> Duration {
        Duration::from_millis(self.captcha_ttl_ms)
    }

    /// キャプチャ掃除間隔
    pub fn captcha_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.captcha_sweep_interval_ms)
    }
}
