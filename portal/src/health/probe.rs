//! TCPプローブ
//!
//! 1回だけ時間制限付きでTCP接続を試み、結果を分類する。
//! リトライは行わない（周期は監視ループ側の責務）。

use async_trait::async_trait;
use realm_portal_common::error::ProbeError;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

/// プローブのデフォルトタイムアウト（ミリ秒）
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;

/// タイムアウト時の理由文字列
pub const CONNECTION_TIMEOUT_REASON: &str = "Connection timeout";

/// プローブ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 接続成功
    Up,
    /// 接続失敗（タイムアウト、拒否、名前解決失敗など）
    Down {
        /// 失敗理由
        reason: String,
    },
}

/// プローブの抽象
///
/// `Err` は「接続できなかった」ではなく、プローブ自体が実行できなかったことを表す。
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    /// `host:port` を一度だけ検査する
    async fn probe(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<ProbeOutcome, ProbeError>;
}

/// TCP接続によるプローブ
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

#[async_trait]
impl Prober for TcpProbe {
    async fn probe(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<ProbeOutcome, ProbeError> {
        Ok(probe_tcp(host, port, timeout).await)
    }
}

/// `host:port` へのTCP接続を `timeout` 以内に試みる
pub async fn probe_tcp(host: &str, port: u16, timeout: Duration) -> ProbeOutcome {
    race_connect(TcpStream::connect((host, port)), timeout).await
}

/// 接続フューチャーとタイムアウトを競わせる
///
/// 接続・エラー・タイムアウトのうち最初に起きた一つだけが結果になる。
/// タイムアウト時は接続中のフューチャーをドロップし、ソケットも破棄される。
pub async fn race_connect<F, S>(connect: F, timeout: Duration) -> ProbeOutcome
where
    F: Future<Output = io::Result<S>>,
{
    match time::timeout(timeout, connect).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ProbeOutcome::Up
        }
        Ok(Err(e)) => ProbeOutcome::Down {
            reason: e.to_string(),
        },
        Err(_) => ProbeOutcome::Down {
            reason: CONNECTION_TIMEOUT_REASON.to_string(),
        },
    }
}
