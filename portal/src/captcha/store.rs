//! 有効期限付きキーバリューストア
//!
//! `take` は読み出しと削除を一度に行い、同じキーの値を渡すのは高々一回。
//! 期限切れは `take` 時の判定と定期的な掃除タスクの両方で扱う。

use crate::shutdown::ShutdownController;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

/// 有効期限付きストア
///
/// 件数は少ない前提のため、マップ全体を一つのロックで守る。
/// ロック内で `await` はしない。
pub struct ExpiringTokenStore<K, V> {
    entries: Arc<Mutex<HashMap<K, Entry<V>>>>,
}

impl<K, V> Clone for ExpiringTokenStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<K, V> Default for ExpiringTokenStore<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> ExpiringTokenStore<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値を挿入（既存キーは上書き）
    pub async fn put(&self, key: K, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            inserted_at: Instant::now(),
            ttl,
        };
        self.entries.lock().await.insert(key, entry);
    }

    /// 値を取り出して削除
    ///
    /// 存在しない・取り出し済み・期限切れのいずれも `None`。
    pub async fn take(&self, key: &K) -> Option<V> {
        let entry = self.entries.lock().await.remove(key)?;
        if entry.is_expired(Instant::now()) {
            return None;
        }
        Some(entry.value)
    }

    /// 期限切れエントリを物理削除し、削除件数を返す
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// 保持しているエントリ数（期限切れで未掃除のものを含む）
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// 空かどうか
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// 掃除タスクを起動
    pub fn spawn_sweeper(
        &self,
        sweep_interval: Duration,
        shutdown: ShutdownController,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut timer = interval(sweep_interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                interval_ms = sweep_interval.as_millis() as u64,
                "Expired entry sweeper started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.wait() => break,
                    _ = timer.tick() => {}
                }

                let removed = store.purge_expired().await;
                if removed > 0 {
                    debug!(removed, "Purged expired entries");
                }
            }

            debug!("Expired entry sweeper stopped");
        })
    }
}
