//! Realm Portal Server
//!
//! ゲームサーバーの死活監視、画像キャプチャ、アカウント登録を提供するWebポータル

#![warn(missing_docs)]

/// アカウント保存
pub mod accounts;

/// REST APIハンドラー
pub mod api;

/// 画像キャプチャの発行・検証
pub mod captcha;

/// コマンドライン引数
pub mod cli;

/// データベース接続とマイグレーション
pub mod db;

/// エンドポイント死活監視
pub mod health;

/// ログ初期化
pub mod logging;

/// HTTPサーバー起動
pub mod server;

/// グレースフルシャットダウン
pub mod shutdown;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// エンドポイントの状態テーブル（読み取り専用で参照）
    pub status_table: health::StatusTable,
    /// キャプチャ発行・検証
    pub captcha: captcha::ChallengeIssuer,
    /// アカウントストア
    pub accounts: Arc<dyn accounts::AccountStore>,
}
