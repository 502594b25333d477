//! Realm Portal 共通ライブラリ
//!
//! ポータルサーバーとテストで共有する設定・型・プロトコル・エラー定義

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

/// HTTP APIペイロード定義
pub mod protocol;

/// 共通型定義
pub mod types;
