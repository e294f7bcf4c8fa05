use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::token::{self, TokenCheck, TokenEnvelope};
use crate::domain::{AuthorityKey, Envelope, EnvelopeCipher, SealedParts};

use super::port::{
    AuthorityKeyProvider, RemoteAuthorityTransport, SecureChannelError, SITE_UPDATE_PATH,
};

/// 権威サーバとのセキュアチャネルを司るアプリケーションサービス。
///
/// - 鍵マテリアルの解決、封筒の封緘／開封、トークン検証を 1 つの入口に束ねる。
/// - 呼び出しごとに単一の処理フローで完結し、共有する可変状態は鍵キャッシュのみ。
pub struct SecureChannelService<T, K, C> {
    pub transport: T,
    pub key_provider: K,
    pub cipher: C,
}

impl<T, K, C> SecureChannelService<T, K, C>
where
    T: RemoteAuthorityTransport,
    K: AuthorityKeyProvider,
    C: EnvelopeCipher,
{
    /// 権威サーバの鍵マテリアルを返す。初回のみフェッチが走る。
    pub fn public_key(&self) -> Result<AuthorityKey, SecureChannelError> {
        Ok(self.key_provider.authority_key()?)
    }

    /// 構造化データをハイブリッド封緘し、base64 封筒文字列を返す。
    pub fn encrypt(&self, data: &Value) -> Result<String, SecureChannelError> {
        let plaintext = serde_json::to_vec(data)
            .map_err(|e| SecureChannelError::Encryption(format!("payload serialization failed: {e}")))?;

        let authority_key = self.key_provider.authority_key()?;
        let sealed = self.cipher.seal(&plaintext, &authority_key)?;

        // 封緘が実際に入力を変換したことの確認。no-op を成功として扱わない。
        if sealed.wrapped_key.is_empty() || sealed.ciphertext.is_empty() {
            return Err(SecureChannelError::Encryption(
                "sealing produced empty cryptographic material".into(),
            ));
        }
        if sealed.ciphertext == plaintext {
            return Err(SecureChannelError::Encryption(
                "sealing left the payload untransformed".into(),
            ));
        }

        let envelope = Envelope::from_parts(&sealed.wrapped_key, &sealed.ciphertext);
        Ok(envelope.encode()?)
    }

    /// base64 封筒文字列を開封し、元の構造化データを返す。
    ///
    /// - 封筒の形式検査は暗号処理よりも先に行い、不正な入力では鍵フェッチも走らせない。
    pub fn decrypt(&self, cypher_text: &str) -> Result<Value, SecureChannelError> {
        let envelope = Envelope::decode(cypher_text)?;
        let wrapped_key = envelope.wrapped_key_bytes()?;
        let ciphertext = envelope.message_bytes()?;

        let authority_key = self.key_provider.authority_key()?;
        let sealed = SealedParts {
            wrapped_key,
            ciphertext,
        };
        let plaintext = self.cipher.open(&sealed, &authority_key)?;

        serde_json::from_slice(&plaintext).map_err(|e| {
            SecureChannelError::Encryption(format!("decrypted payload is not structured data: {e}"))
        })
    }

    /// トークンを検証し、判定理由つきの結果を返す。
    ///
    /// - ここではエラーを外に出さない。鍵フェッチ失敗を含むすべての失敗が
    ///   いずれかの拒否理由に落ちる。
    pub fn verify_token(&self, encrypted_remote_token: &str, trusted_timestamp: i64) -> TokenCheck {
        let Some(remote_token) = TokenEnvelope::decode(encrypted_remote_token) else {
            return TokenCheck::Malformed;
        };
        let Some(remote_timestamp) = remote_token.remote_timestamp() else {
            return TokenCheck::Malformed;
        };
        if !token::within_freshness_window(remote_timestamp, trusted_timestamp) {
            debug!(remote_timestamp, trusted_timestamp, "token outside freshness window");
            return TokenCheck::OutsideWindow;
        }
        let Some(signature) = remote_token.signature_bytes() else {
            return TokenCheck::Malformed;
        };
        let Some(signed_message) = remote_token.raw_time_bytes() else {
            return TokenCheck::Malformed;
        };

        let authority_key = match self.key_provider.authority_key() {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "authority key unavailable during token verification");
                return TokenCheck::KeyUnavailable;
            }
        };

        match self
            .cipher
            .verify_signature(&signed_message, &signature, &authority_key)
        {
            Ok(true) => TokenCheck::Valid,
            Ok(false) => TokenCheck::SignatureMismatch,
            Err(err) => {
                debug!(error = %err, "token signature verification errored");
                TokenCheck::SignatureMismatch
            }
        }
    }

    /// トークンが有効なときだけ true を返す。失敗はすべて false に畳み込む。
    pub fn is_valid_token(&self, encrypted_remote_token: &str, trusted_timestamp: i64) -> bool {
        self.verify_token(encrypted_remote_token, trusted_timestamp)
            .is_valid()
    }

    /// データを封緘して権威サーバへ送信し、レスポンスボディを返す。
    pub fn post_data(&self, data: &Value) -> Result<Vec<u8>, SecureChannelError> {
        let body = self.encrypt(data)?;
        Ok(self.transport.post(SITE_UPDATE_PATH, body.as_bytes())?)
    }
}
