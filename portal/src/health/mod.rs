//! サービス死活監視
//!
//! ログインサーバー・ゲームサーバーなどのTCPエンドポイントを周期的にプローブし、
//! 最新の状態をHTTP層へ提供する。

pub mod monitor;
pub mod probe;

pub use monitor::{LivenessMonitor, StatusTable};
pub use probe::{ProbeOutcome, Prober, TcpProbe};
