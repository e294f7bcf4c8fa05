use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// トークンの鮮度許容幅（秒）。信頼時刻との差がこの幅を超えたトークンは
/// リプレイとみなして拒否する。両端は含む。
pub const FRESHNESS_WINDOW_SECS: i64 = 20;

/// 権威サーバが発行する認証トークンのワイヤ構造。
///
/// - `time`: 10 進 ASCII タイムスタンプの base64。
/// - `signature`: タイムスタンプ生バイト列に対する署名の base64。
/// - 一度検証したら破棄する。永続化はしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEnvelope {
    pub time: String,
    pub signature: String,
}

/// トークン検証の内部判定。
///
/// - 呼び出し側の境界では bool に畳み込まれるが、テストでは拒否理由まで
///   区別して検証できるようにしておく。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    /// 形式・鮮度・署名のすべてを満たした。
    Valid,
    /// 構造が成立していない（base64 / JSON / フィールド欠落・空・非数値時刻）。
    Malformed,
    /// 埋め込みタイムスタンプが鮮度許容幅の外にある。
    OutsideWindow,
    /// 署名がタイムスタンプと一致しない。
    SignatureMismatch,
    /// 権威鍵が取得できず検証を実行できなかった。
    KeyUnavailable,
}

impl TokenCheck {
    pub fn is_valid(self) -> bool {
        matches!(self, TokenCheck::Valid)
    }
}

impl TokenEnvelope {
    /// ワイヤ表現からトークン封筒を復元する。
    ///
    /// - オブジェクトでない入力や `time` / `signature` の欠落・空はすべて None。
    ///   トークン検証は fail-closed のため、理由の詳細は返さない。
    pub fn decode(encoded: &str) -> Option<Self> {
        let raw = BASE64_STANDARD.decode(encoded.trim()).ok()?;
        let token: TokenEnvelope = serde_json::from_slice(&raw).ok()?;
        if token.time.is_empty() || token.signature.is_empty() {
            return None;
        }
        Some(token)
    }

    /// `time` フィールドの生バイト列（署名対象そのもの）を返す。
    pub fn raw_time_bytes(&self) -> Option<Vec<u8>> {
        let raw = BASE64_STANDARD.decode(&self.time).ok()?;
        if raw.is_empty() {
            return None;
        }
        Some(raw)
    }

    /// `time` フィールドを数値タイムスタンプとして解釈する。
    pub fn remote_timestamp(&self) -> Option<i64> {
        let raw = self.raw_time_bytes()?;
        let text = std::str::from_utf8(&raw).ok()?;
        text.trim().parse::<i64>().ok()
    }

    /// `signature` フィールドをデコードして署名バイト列を返す。
    pub fn signature_bytes(&self) -> Option<Vec<u8>> {
        let raw = BASE64_STANDARD.decode(&self.signature).ok()?;
        if raw.is_empty() {
            return None;
        }
        Some(raw)
    }
}

/// 信頼できる時刻を基準に、埋め込みタイムスタンプが鮮度許容幅内かを判定する。
pub fn within_freshness_window(remote_timestamp: i64, trusted_timestamp: i64) -> bool {
    match remote_timestamp
        .checked_sub(trusted_timestamp)
        .and_then(i64::checked_abs)
    {
        Some(delta) => delta <= FRESHNESS_WINDOW_SECS,
        None => false,
    }
}
