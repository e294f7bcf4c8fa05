use super::authority_key::AuthorityKey;

/// ハイブリッド封緘で発生しうるエラー。
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeCipherError {
    /// 暗号処理に失敗した場合（hpke-rs / aes-gcm などからのエラーをラップ）。
    #[error("crypto error: {0}")]
    CryptoError(String),
    /// 入力値（鍵やパラメータなど）が不正な場合。
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// 封緘の結果。ワイヤ封筒の `key` / `message` フィールドの素材になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedParts {
    /// メッセージごとの対称鍵を権威鍵向けにラップしたバイト列。
    pub wrapped_key: Vec<u8>,
    /// ペイロード本体の暗号文。
    pub ciphertext: Vec<u8>,
}

/// ペイロードを権威鍵向けにハイブリッド封緘／開封し、権威の署名を検証するためのポート。
///
/// - 具体的なアルゴリズム（HPKE や AEAD の選択）は infra 層の実装に委譲する。
/// - このプロトコルでは封緘と開封の両方が同じ鍵マテリアルでパラメータ化される点に注意。
///   鍵ペアの使い分けはワイヤ互換性の制約であり、このポートの契約として固定する。
pub trait EnvelopeCipher {
    /// 平文を封緘し、ラップ済み鍵とペイロード暗号文を返す。
    fn seal(
        &self,
        plaintext: &[u8],
        authority_key: &AuthorityKey,
    ) -> Result<SealedParts, EnvelopeCipherError>;

    /// 封緘結果を開封し、元の平文を返す。
    fn open(
        &self,
        sealed: &SealedParts,
        authority_key: &AuthorityKey,
    ) -> Result<Vec<u8>, EnvelopeCipherError>;

    /// `message` に対する権威の署名を検証する。
    ///
    /// - 署名が正しくないだけの場合は `Ok(false)`。`Err` は鍵マテリアル不正などの処理失敗のみ。
    fn verify_signature(
        &self,
        message: &[u8],
        signature: &[u8],
        authority_key: &AuthorityKey,
    ) -> Result<bool, EnvelopeCipherError>;
}
