use serde_json::Value;

use torii_secure::application_service::secure_channel::{
    RemoteAuthorityTransport, SecureChannelError, SecureChannelService,
};
use torii_secure::domain::AuthorityKey;
use torii_secure::infrastructure::crypto::HpkeEnvelopeCipher;
use torii_secure::infrastructure::CachedAuthorityKeyProvider;

/// ToriiController - SDK のオーケストレーター
///
/// 権威サーバとのセキュアチャネル（封緘・開封・トークン検証）を 1 つの入口に束ね、
/// ホストアプリケーションへ公開する。トランスポート実装（HTTP クライアントなど）は
/// ホスト側から注入する。
pub struct ToriiController<T: RemoteAuthorityTransport> {
    /// 権威サーバのベース URL（トランスポート実装が利用する）
    authority_url: String,
    /// セキュアチャネルサービス
    service: SecureChannelService<T, CachedAuthorityKeyProvider<T>, HpkeEnvelopeCipher>,
}

impl<T: RemoteAuthorityTransport + Clone> ToriiController<T> {
    /// 環境変数から権威サーバ URL を取得して ToriiController を生成
    ///
    /// 環境変数 `TORII_AUTHORITY_URL` が設定されている場合はそれを使用し、
    /// 設定されていない場合はデフォルト値 `http://127.0.0.1:8080` を使用します。
    pub fn new(transport: T) -> Self {
        let authority_url = std::env::var("TORII_AUTHORITY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        Self::with_authority_url(transport, authority_url)
    }

    /// 明示的に権威サーバ URL を指定して ToriiController を生成
    pub fn with_authority_url(transport: T, authority_url: impl Into<String>) -> Self {
        let key_provider = CachedAuthorityKeyProvider::new(transport.clone());
        Self {
            authority_url: authority_url.into(),
            service: SecureChannelService {
                transport,
                key_provider,
                cipher: HpkeEnvelopeCipher,
            },
        }
    }

    /// 権威サーバのベース URL を返す
    pub fn authority_url(&self) -> &str {
        &self.authority_url
    }

    /// 権威サーバの鍵マテリアルを返す（初回のみフェッチが走る）
    pub fn public_key(&self) -> Result<AuthorityKey, SecureChannelError> {
        self.service.public_key()
    }

    /// 構造化データを封緘し、base64 封筒文字列を返す
    pub fn encrypt(&self, data: &Value) -> Result<String, SecureChannelError> {
        self.service.encrypt(data)
    }

    /// base64 封筒文字列を開封し、元の構造化データを返す
    pub fn decrypt(&self, cypher_text: &str) -> Result<Value, SecureChannelError> {
        self.service.decrypt(cypher_text)
    }

    /// 権威サーバ発行のトークンを検証する。失敗はすべて false に畳み込まれる
    pub fn is_valid_token(&self, encrypted_remote_token: &str, trusted_timestamp: i64) -> bool {
        self.service
            .is_valid_token(encrypted_remote_token, trusted_timestamp)
    }

    /// データを封緘して権威サーバへ送信し、レスポンスボディを返す
    pub fn post_data(&self, data: &Value) -> Result<Vec<u8>, SecureChannelError> {
        self.service.post_data(data)
    }
}
