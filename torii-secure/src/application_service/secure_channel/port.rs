use crate::domain::{AuthorityKey, EnvelopeCipherError, EnvelopeCodecError};

/// 権威サーバの公開鍵を取得するパス。GET、ボディは鍵バイト列の base64。
pub const PUBLIC_KEY_PATH: &str = "/public-key";
/// 封緘済みサイトデータを送信するパス。POST、ボディは base64 封筒文字列。
pub const SITE_UPDATE_PATH: &str = "/site-update";

/// 信頼できないトランスポート経由で権威サーバとバイト列を交換するためのポート。
///
/// - 実装は HTTP クライアント（Basic 認証・クライアント証明書・リダイレクト追従を含む）
///   などを想定するが、このコアからは「パスとバイト列」の往復としてのみ見える。
/// - 非成功レスポンスはすべて `TransportError` として表現する。
/// - タイムアウトやリトライの方針は実装側の責務とし、コアは行わない。
pub trait RemoteAuthorityTransport {
    /// 指定パスから GET でレスポンスボディを取得する。
    fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// 指定パスへ POST でボディを送信し、レスポンスボディを返す。
    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// トランスポート層の失敗。ステータスコードと人間可読な理由を保持する。
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status} {reason}")]
pub struct TransportError {
    pub status: u16,
    pub reason: String,
}

/// 権威サーバの鍵マテリアルを解決するためのポート。
///
/// - 実装はプロセス内キャッシュ付きのフェッチャを想定。取得済みの鍵は
///   プロセスの生存期間中は不変として扱う。
pub trait AuthorityKeyProvider {
    fn authority_key(&self) -> Result<AuthorityKey, AuthorityKeyError>;
}

/// 鍵マテリアル解決で発生しうるエラー。
#[derive(Debug, thiserror::Error)]
pub enum AuthorityKeyError {
    /// 権威サーバとの通信に失敗した場合（非 200 応答など）。
    #[error("remote communication failed ({status}): {reason}")]
    RemoteCommunication { status: u16, reason: String },
    /// 取得したボディが鍵マテリアルとして成立していない場合。
    #[error("authority key material is invalid: {0}")]
    InvalidKeyMaterial(String),
    /// キャッシュ状態へのアクセスに失敗した場合。
    #[error("authority key cache error: {0}")]
    Cache(String),
}

/// セキュアチャネル全体のエラー。
///
/// - 通信失敗と暗号処理失敗だけを区別する。トークン検証の失敗はエラーには
///   ならず、検証結果の bool に畳み込まれる。
#[derive(Debug, thiserror::Error)]
pub enum SecureChannelError {
    /// 権威サーバとの通信失敗。内部でリトライはしない。
    #[error("remote communication failed ({status}): {reason}")]
    RemoteCommunication { status: u16, reason: String },
    /// 封緘・開封の失敗、封筒の形式不正、空または恒等な暗号文。
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl From<TransportError> for SecureChannelError {
    fn from(err: TransportError) -> Self {
        SecureChannelError::RemoteCommunication {
            status: err.status,
            reason: err.reason,
        }
    }
}

impl From<AuthorityKeyError> for SecureChannelError {
    fn from(err: AuthorityKeyError) -> Self {
        match err {
            AuthorityKeyError::RemoteCommunication { status, reason } => {
                SecureChannelError::RemoteCommunication { status, reason }
            }
            AuthorityKeyError::InvalidKeyMaterial(detail) => SecureChannelError::Encryption(detail),
            AuthorityKeyError::Cache(detail) => SecureChannelError::Encryption(detail),
        }
    }
}

impl From<EnvelopeCodecError> for SecureChannelError {
    fn from(err: EnvelopeCodecError) -> Self {
        SecureChannelError::Encryption(err.to_string())
    }
}

impl From<EnvelopeCipherError> for SecureChannelError {
    fn from(err: EnvelopeCipherError) -> Self {
        SecureChannelError::Encryption(err.to_string())
    }
}
