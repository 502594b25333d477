//! 画像キャプチャ
//!
//! 発行時に回答を有効期限付きストアへ保存し、検証時に一度だけ取り出す。
//! 回答の正誤にかかわらずトークンは消費される。

pub mod render;
pub mod store;

pub use store::ExpiringTokenStore;

use rand::seq::SliceRandom;
use rand::Rng;
use realm_portal_common::error::ChallengeRejection;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// 回答の文字数
pub const ANSWER_LENGTH: usize = 5;

/// 回答に使う文字（`0 o 1 i I l` を除いた英数字）
pub const ANSWER_CHARSET: &[u8] =
    b"23456789abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNOPQRSTUVWXYZ";

/// キャプチャのデフォルト有効期限（ミリ秒）
pub const DEFAULT_CAPTCHA_TTL_MS: u64 = 10 * 60 * 1000;

/// 発行されたチャレンジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// チャレンジトークン
    pub token: String,
    /// SVG画像
    pub image: String,
}

/// キャプチャの発行・検証
#[derive(Clone)]
pub struct ChallengeIssuer {
    store: ExpiringTokenStore<String, String>,
    ttl: Duration,
}

impl ChallengeIssuer {
    /// ストアを共有して作成
    pub fn new(store: ExpiringTokenStore<String, String>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// 新しいストアとデフォルト有効期限で作成
    pub fn with_default_ttl() -> Self {
        Self::new(
            ExpiringTokenStore::new(),
            Duration::from_millis(DEFAULT_CAPTCHA_TTL_MS),
        )
    }

    /// 回答を保持しているストア
    pub fn store(&self) -> &ExpiringTokenStore<String, String> {
        &self.store
    }

    /// チャレンジを発行
    pub async fn issue(&self) -> Challenge {
        self.issue_with_answer().await.0
    }

    async fn issue_with_answer(&self) -> (Challenge, String) {
        // ThreadRng は Send ではないため await より前に使い切る
        let (answer, image) = {
            let mut rng = rand::thread_rng();
            let answer = generate_answer(&mut rng);
            let image = render::render_svg(&answer, &mut rng);
            (answer, image)
        };
        let token = Uuid::new_v4().to_string();

        self.store
            .put(token.clone(), answer.to_lowercase(), self.ttl)
            .await;
        debug!("Captcha issued");

        (Challenge { token, image }, answer)
    }

    /// 回答を検証（トークンは必ず消費される）
    ///
    /// 失敗理由は呼び出し側に区別させない。
    pub async fn validate(&self, token: &str, answer: &str) -> bool {
        match self.check(token, answer).await {
            Ok(()) => true,
            Err(reason) => {
                debug!(reason = %reason, "Captcha rejected");
                false
            }
        }
    }

    async fn check(&self, token: &str, answer: &str) -> Result<(), ChallengeRejection> {
        let expected = self
            .store
            .take(&token.to_string())
            .await
            .ok_or(ChallengeRejection::TokenNotFound)?;

        if answer.trim().to_lowercase() == expected {
            Ok(())
        } else {
            Err(ChallengeRejection::TokenMismatch)
        }
    }
}

/// 回答文字列を生成
pub fn generate_answer<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ANSWER_LENGTH)
        .filter_map(|_| ANSWER_CHARSET.choose(&mut *rng).map(|&b| b as char))
        .collect()
}
