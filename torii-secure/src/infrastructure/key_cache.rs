use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use tracing::debug;

use crate::application_service::secure_channel::{
    AuthorityKeyError, AuthorityKeyProvider, RemoteAuthorityTransport, PUBLIC_KEY_PATH,
};
use crate::domain::AuthorityKey;

/// プロセス内キャッシュ付きの `AuthorityKeyProvider` 実装。
///
/// - 初回アクセスで一度だけ `/public-key` をフェッチし、以後はキャッシュを返す。
/// - フェッチ失敗時はキャッシュを空のまま保ち、次回呼び出しで再試行する
///   （負のキャッシュは持たない）。
/// - ロックをフェッチ中も保持するため、同時アクセス下でもフェッチは常に
///   1 本に直列化され、各呼び出しは「空」か「完全に格納済みの鍵」だけを観測する。
#[derive(Clone)]
pub struct CachedAuthorityKeyProvider<T> {
    transport: T,
    cached: Arc<Mutex<Option<AuthorityKey>>>,
}

impl<T> CachedAuthorityKeyProvider<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cached: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T: RemoteAuthorityTransport> CachedAuthorityKeyProvider<T> {
    fn fetch_key(&self) -> Result<AuthorityKey, AuthorityKeyError> {
        let body = self.transport.fetch(PUBLIC_KEY_PATH).map_err(|e| {
            AuthorityKeyError::RemoteCommunication {
                status: e.status,
                reason: e.reason,
            }
        })?;

        let text = std::str::from_utf8(&body).map_err(|e| {
            AuthorityKeyError::InvalidKeyMaterial(format!("key body is not UTF-8: {e}"))
        })?;
        let bytes = BASE64_STANDARD.decode(text.trim()).map_err(|e| {
            AuthorityKeyError::InvalidKeyMaterial(format!("key body is not base64: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(AuthorityKeyError::InvalidKeyMaterial(
                "key body decodes to zero bytes".into(),
            ));
        }

        debug!(key_len = bytes.len(), "fetched authority key material");
        Ok(AuthorityKey::new(bytes))
    }
}

impl<T: RemoteAuthorityTransport> AuthorityKeyProvider for CachedAuthorityKeyProvider<T> {
    fn authority_key(&self) -> Result<AuthorityKey, AuthorityKeyError> {
        let mut guard = self
            .cached
            .lock()
            .map_err(|e| AuthorityKeyError::Cache(e.to_string()))?;

        if let Some(key) = guard.as_ref() {
            return Ok(key.clone());
        }

        let key = self.fetch_key()?;
        *guard = Some(key.clone());
        Ok(key)
    }
}
