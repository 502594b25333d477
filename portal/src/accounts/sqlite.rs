//! SQLiteによるアカウント保存

use super::password::{hash_password, DEFAULT_HASH_COST};
use super::AccountStore;
use async_trait::async_trait;
use chrono::Utc;
use realm_portal_common::error::{PortalError, PortalResult};
use sqlx::SqlitePool;

/// SQLiteアカウントストア
#[derive(Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
    hash_cost: u32,
}

impl SqliteAccountStore {
    /// マイグレーション済みのプールから作成
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// bcryptコストを設定
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// データベースプール
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn account_exists(&self, login: &str) -> PortalResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM accounts WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortalError::Database(format!("Failed to check account: {}", e)))?;

        Ok(row.is_some())
    }

    async fn create_account(&self, login: &str, password: &str) -> PortalResult<i64> {
        // bcryptはCPUを占有するためブロッキングスレッドで実行
        let password = password.to_string();
        let cost = self.hash_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| PortalError::Internal(format!("Failed to join hash task: {}", e)))??;

        let result = sqlx::query(
            "INSERT INTO accounts (login, password, created_at) VALUES (?, ?, ?)",
        )
        .bind(login)
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                PortalError::Conflict(format!("Login '{}' already exists", login))
            } else {
                PortalError::Database(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(result.last_insert_rowid())
    }
}
