//! サービス死活監視
//!
//! エンドポイントごとに独立したタスクで周期的にプローブを実行し、
//! 最新の状態をステータステーブルに確定させる。読み出しはネットワークを待たない。

use super::probe::{ProbeOutcome, Prober, DEFAULT_PROBE_TIMEOUT_MS};
use crate::shutdown::ShutdownController;
use chrono::Utc;
use futures::future::join_all;
use realm_portal_common::config::MonitoredEndpoint;
use realm_portal_common::error::{PortalError, PortalResult, ProbeError};
use realm_portal_common::types::{EndpointState, EndpointStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// デフォルトのポーリング間隔（ミリ秒）
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// プローブ自身のタイムアウトを超えて待つ猶予
const PROBE_GRACE: Duration = Duration::from_secs(1);

/// エンドポイント状態テーブル
///
/// レコードごとの書き込み手は自身の監視ループのみ。
/// 状態・エラー・時刻は一度の書き込みロックで置き換えるため、
/// 読み出し側が中途半端な組み合わせを見ることはない。
#[derive(Clone, Default)]
pub struct StatusTable {
    entries: Arc<RwLock<HashMap<String, EndpointStatus>>>,
}

impl StatusTable {
    /// 空のテーブルを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// エンドポイントの状態を取得
    pub async fn get(&self, id: &str) -> Option<EndpointStatus> {
        self.entries.read().await.get(id).cloned()
    }

    /// すべてのエンドポイントの状態を取得（ID順）
    pub async fn list(&self) -> Vec<EndpointStatus> {
        let mut statuses: Vec<_> = self.entries.read().await.values().cloned().collect();
        statuses.sort_by(|a, b| a.id.cmp(&b.id));
        statuses
    }

    async fn insert(&self, status: EndpointStatus) -> bool {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&status.id) {
            return false;
        }
        entries.insert(status.id.clone(), status);
        true
    }

    /// 状態を確定し、直前の状態を返す
    async fn commit(
        &self,
        id: &str,
        state: EndpointState,
        error: Option<String>,
    ) -> Option<EndpointState> {
        let mut entries = self.entries.write().await;
        let record = entries.get_mut(id)?;
        let previous = record.state;

        record.state = state;
        record.last_error = if state.carries_error() { error } else { None };
        if state != EndpointState::Checking {
            record.checked_at = Some(Utc::now());
        }

        Some(previous)
    }
}

/// 監視ループが参照する設定
#[derive(Clone)]
struct LoopContext {
    table: StatusTable,
    prober: Arc<dyn Prober>,
    poll_interval: Duration,
    probe_timeout: Duration,
    shutdown: ShutdownController,
}

/// サービス死活モニター
///
/// `register` で監視対象を登録し、`start` でエンドポイントごとの
/// ループを起動する。ループはプロセス終了か `shutdown` まで動き続ける。
pub struct LivenessMonitor {
    context: LoopContext,
    endpoints: Mutex<Vec<MonitoredEndpoint>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    started: Mutex<bool>,
}

impl LivenessMonitor {
    /// 新しいモニターを作成
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            context: LoopContext {
                table: StatusTable::new(),
                prober,
                poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
                probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
                shutdown: ShutdownController::default(),
            },
            endpoints: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
            started: Mutex::new(false),
        }
    }

    /// ポーリング間隔を設定
    pub fn with_interval(mut self, poll_interval: Duration) -> Self {
        self.context.poll_interval = poll_interval;
        self
    }

    /// プローブのタイムアウトを設定
    pub fn with_timeout(mut self, probe_timeout: Duration) -> Self {
        self.context.probe_timeout = probe_timeout;
        self
    }

    /// シャットダウンコントローラーを共有する
    pub fn with_shutdown(mut self, shutdown: ShutdownController) -> Self {
        self.context.shutdown = shutdown;
        self
    }

    /// ステータステーブル（HTTP層へ注入する読み取り用ハンドル）
    pub fn status_table(&self) -> StatusTable {
        self.context.table.clone()
    }

    /// 監視対象を登録
    ///
    /// 起動済みであればその場でループを開始する。
    pub async fn register(&self, endpoint: MonitoredEndpoint) -> PortalResult<()> {
        let status = EndpointStatus::new(&endpoint.id, &endpoint.host, endpoint.port);
        if !self.context.table.insert(status).await {
            return Err(PortalError::DuplicateEndpoint(endpoint.id));
        }

        info!(
            endpoint = %endpoint.id,
            host = %endpoint.host,
            port = endpoint.port,
            "Endpoint registered for liveness monitoring"
        );

        let started = self.started.lock().await;
        if *started {
            self.spawn_loop(endpoint).await;
        } else {
            self.endpoints.lock().await.push(endpoint);
        }
        Ok(())
    }

    /// 登録済みの全エンドポイントの監視を開始
    pub async fn start(&self) {
        let mut started = self.started.lock().await;
        if *started {
            warn!("Liveness monitor already started");
            return;
        }
        *started = true;

        let endpoints: Vec<_> = self.endpoints.lock().await.drain(..).collect();

        info!(
            count = endpoints.len(),
            interval_ms = self.context.poll_interval.as_millis() as u64,
            timeout_ms = self.context.probe_timeout.as_millis() as u64,
            "Liveness monitor started"
        );

        for endpoint in endpoints {
            self.spawn_loop(endpoint).await;
        }
    }

    /// 最新の確定状態を取得（ネットワークを待たない）
    pub async fn status_of(&self, id: &str) -> Option<EndpointStatus> {
        self.context.table.get(id).await
    }

    /// 全エンドポイントの最新状態を取得
    pub async fn list(&self) -> Vec<EndpointStatus> {
        self.context.table.list().await
    }

    /// 監視ループを停止し、終了を待つ
    pub async fn shutdown(&self) {
        self.context.shutdown.request_shutdown();

        let tasks: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for result in join_all(tasks).await {
            if let Err(e) = result {
                error!("Liveness loop join error: {}", e);
            }
        }

        info!("Liveness monitor stopped");
    }

    async fn spawn_loop(&self, endpoint: MonitoredEndpoint) {
        let context = self.context.clone();
        let handle = tokio::spawn(async move {
            monitor_loop(context, endpoint).await;
        });
        self.tasks.lock().await.push(handle);
    }
}

/// 1エンドポイント分の監視ループ
///
/// プローブはループ内で待つため同一エンドポイントのティックは重ならない。
/// プローブが長引いた場合、次のティックは後ろへずれる。
async fn monitor_loop(context: LoopContext, endpoint: MonitoredEndpoint) {
    let mut timer = interval(context.poll_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_outcome = EndpointState::Unknown;

    loop {
        tokio::select! {
            biased;
            _ = context.shutdown.wait() => break,
            _ = timer.tick() => {}
        }

        let (state, reason) = check_endpoint(&context, &endpoint).await;
        log_outcome(&endpoint, last_outcome, state, reason.as_deref());
        last_outcome = state;
    }

    debug!(endpoint = %endpoint.id, "Liveness loop stopped");
}

/// 1回分のチェック: Checking → プローブ → 結果を確定
async fn check_endpoint(
    context: &LoopContext,
    endpoint: &MonitoredEndpoint,
) -> (EndpointState, Option<String>) {
    context
        .table
        .commit(&endpoint.id, EndpointState::Checking, None)
        .await;

    let (state, reason) = match run_probe(context, endpoint).await {
        Ok(ProbeOutcome::Up) => (EndpointState::Up, None),
        Ok(ProbeOutcome::Down { reason }) => (EndpointState::Down, Some(reason)),
        Err(e) => (EndpointState::Error, Some(e.to_string())),
    };

    context
        .table
        .commit(&endpoint.id, state, reason.clone())
        .await;

    (state, reason)
}

/// プローブを別タスクで実行する
///
/// パニックは `ProbeError::TaskAborted` として吸収し、
/// タイムアウトを守らないプローブは猶予後に中断する。
async fn run_probe(
    context: &LoopContext,
    endpoint: &MonitoredEndpoint,
) -> Result<ProbeOutcome, ProbeError> {
    let prober = context.prober.clone();
    let host = endpoint.host.clone();
    let port = endpoint.port;
    let probe_timeout = context.probe_timeout;

    let mut handle =
        tokio::spawn(async move { prober.probe(&host, port, probe_timeout).await });

    match tokio::time::timeout(probe_timeout + PROBE_GRACE, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ProbeError::TaskAborted(join_error.to_string())),
        Err(_) => {
            handle.abort();
            Err(ProbeError::Unexpected(format!(
                "probe did not finish within {} ms",
                (probe_timeout + PROBE_GRACE).as_millis()
            )))
        }
    }
}

fn log_outcome(
    endpoint: &MonitoredEndpoint,
    previous: EndpointState,
    state: EndpointState,
    reason: Option<&str>,
) {
    // 予期しない失敗は毎回記録する
    if state == EndpointState::Error {
        error!(
            endpoint = %endpoint.id,
            error = ?reason,
            "Liveness probe failed unexpectedly"
        );
        return;
    }

    if previous == state {
        debug!(endpoint = %endpoint.id, state = %state, reason = ?reason, "Liveness check");
        return;
    }

    let address = format!("{}:{}", endpoint.host, endpoint.port);
    if state == EndpointState::Up {
        info!(endpoint = %endpoint.id, address = %address, "Endpoint is up");
    } else {
        warn!(
            endpoint = %endpoint.id,
            address = %address,
            reason = ?reason,
            "Endpoint is down"
        );
    }
}
