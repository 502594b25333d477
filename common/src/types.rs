//! 共通型定義
//!
//! 監視対象エンドポイントの状態とスナップショット

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 監視対象サービスの状態
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EndpointState {
    /// 初期状態（未確認）
    #[default]
    Unknown,
    /// プローブ実行中
    Checking,
    /// 接続可能
    Up,
    /// 接続不可（タイムアウト・接続拒否など）
    Down,
    /// プローブ自体の予期しない失敗
    Error,
}

impl EndpointState {
    /// EndpointStateを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Checking => "checking",
            Self::Up => "up",
            Self::Down => "down",
            Self::Error => "error",
        }
    }

    /// エラー詳細を保持する状態か
    pub fn carries_error(&self) -> bool {
        matches!(self, Self::Down | Self::Error)
    }
}

impl std::fmt::Display for EndpointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// エンドポイント状態のスナップショット
///
/// 監視ループが唯一の書き込み手で、読み出し側にはクローンのみを渡す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointStatus {
    /// エンドポイント識別子（"login" / "game" など）
    pub id: String,
    /// ホスト名
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// 現在の状態
    pub state: EndpointState,
    /// 直近の失敗理由（Down / Error のときのみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// 直近の確定時刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl EndpointStatus {
    /// Unknown状態で新しいレコードを作成
    pub fn new(id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
            state: EndpointState::Unknown,
            last_error: None,
            checked_at: None,
        }
    }
}
