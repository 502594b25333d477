//! アカウント登録
//!
//! 保存先は `AccountStore` トレイトの背後に隠し、HTTP層はトレイト経由でのみ扱う。

pub mod password;
pub mod sqlite;

pub use sqlite::SqliteAccountStore;

use async_trait::async_trait;
use realm_portal_common::error::PortalResult;

/// アカウント保存先
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// ログインIDが登録済みか
    async fn account_exists(&self, login: &str) -> PortalResult<bool>;

    /// アカウントを作成しIDを返す
    ///
    /// 重複時は `PortalError::Conflict`。
    async fn create_account(&self, login: &str, password: &str) -> PortalResult<i64>;
}
