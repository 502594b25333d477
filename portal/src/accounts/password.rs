//! パスワードハッシュ化と検証（bcrypt実装）

use bcrypt::{hash, verify};
use realm_portal_common::error::PortalError;

/// パスワードハッシュ化のデフォルトコスト
pub const DEFAULT_HASH_COST: u32 = 12;

/// パスワードをbcryptでハッシュ化
///
/// # Arguments
/// * `password` - ハッシュ化するパスワード
/// * `cost` - bcryptコスト（4〜31）
///
/// # Returns
/// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
/// * `Err(PortalError)` - ハッシュ化失敗
pub fn hash_password(password: &str, cost: u32) -> Result<String, PortalError> {
    hash(password, cost)
        .map_err(|e| PortalError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// パスワードを検証
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PortalError> {
    verify(password, hash)
        .map_err(|e| PortalError::PasswordHash(format!("Failed to verify password: {}", e)))
}
