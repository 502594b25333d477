//! HTTP APIペイロード定義
//!
//! フロントエンド↔ポータル間のリクエスト/レスポンス

use serde::{Deserialize, Deserializer, Serialize};

/// レスポンスの成否
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// 成功
    Success,
    /// 失敗
    Failed,
}

/// 全エンドポイント共通のレスポンス封筒
///
/// `{"status":"success","data":...}` または `{"status":"failed","message":...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T = ()> {
    /// 成否
    pub status: ResponseStatus,
    /// ペイロード
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 人間向けメッセージ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// データ付き成功レスポンス
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    /// メッセージのみの成功レスポンス
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: None,
            message: Some(message.into()),
        }
    }

    /// 失敗レスポンス
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failed,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// GET /captcha のペイロード
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptchaData {
    /// チャレンジトークン
    #[serde(rename = "captchaId")]
    pub captcha_id: String,
    /// SVG画像
    pub captcha: String,
}

/// POST /account のリクエストボディ
///
/// 欠けたフィールドと `null` は空文字列として扱い、ハンドラー側で検証する。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterAccountRequest {
    /// ログインID
    #[serde(default, deserialize_with = "null_as_empty")]
    pub login: String,
    /// パスワード
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
    /// チャレンジトークン
    #[serde(default, rename = "captchaId", deserialize_with = "null_as_empty")]
    pub captcha_id: String,
    /// チャレンジへの回答
    #[serde(default, rename = "captchaCode", deserialize_with = "null_as_empty")]
    pub captcha_code: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
