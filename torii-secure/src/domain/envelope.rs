use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// ハイブリッド暗号化ペイロードを運ぶ 2 フィールドのワイヤ封筒。
///
/// - `key`: メッセージごとの対称鍵を権威鍵でラップしたバイト列の base64。
/// - `message`: ペイロード暗号文の base64。
/// - フィールド名は権威サーバとの互換性契約であり固定。
/// - 全体は JSON に直列化したうえでさらに base64 エンコードして転送される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub key: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeCodecError {
    /// 封筒としての形が成立していない（base64 / JSON / 必須フィールドの欠落）。
    #[error("message not understood: {0}")]
    NotUnderstood(String),
    /// 封筒の直列化に失敗した場合。
    #[error("envelope serialization failed: {0}")]
    Serialize(String),
}

impl Envelope {
    /// ラップ済み鍵とペイロード暗号文から封筒を組み立てる。
    pub fn from_parts(wrapped_key: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            key: BASE64_STANDARD.encode(wrapped_key),
            message: BASE64_STANDARD.encode(ciphertext),
        }
    }

    /// 封筒を base64(JSON) のワイヤ表現へエンコードする。
    pub fn encode(&self) -> Result<String, EnvelopeCodecError> {
        let json = serde_json::to_vec(self).map_err(|e| EnvelopeCodecError::Serialize(e.to_string()))?;
        Ok(BASE64_STANDARD.encode(json))
    }

    /// ワイヤ表現から封筒を復元する。
    ///
    /// - JSON オブジェクトでない、または `key` / `message` が欠落・空の場合は
    ///   封筒全体を拒否する。部分的に復号して信用することはしない。
    pub fn decode(encoded: &str) -> Result<Self, EnvelopeCodecError> {
        let raw = BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|e| EnvelopeCodecError::NotUnderstood(format!("not base64: {e}")))?;
        let envelope: Envelope = serde_json::from_slice(&raw)
            .map_err(|e| EnvelopeCodecError::NotUnderstood(format!("not an envelope object: {e}")))?;
        if envelope.key.is_empty() || envelope.message.is_empty() {
            return Err(EnvelopeCodecError::NotUnderstood(
                "empty key or message field".into(),
            ));
        }
        Ok(envelope)
    }

    /// `key` フィールドをデコードしてラップ済み鍵バイト列を返す。
    pub fn wrapped_key_bytes(&self) -> Result<Vec<u8>, EnvelopeCodecError> {
        Self::decode_field(&self.key, "key")
    }

    /// `message` フィールドをデコードしてペイロード暗号文を返す。
    pub fn message_bytes(&self) -> Result<Vec<u8>, EnvelopeCodecError> {
        Self::decode_field(&self.message, "message")
    }

    fn decode_field(value: &str, name: &str) -> Result<Vec<u8>, EnvelopeCodecError> {
        let bytes = BASE64_STANDARD
            .decode(value)
            .map_err(|e| EnvelopeCodecError::NotUnderstood(format!("{name} is not base64: {e}")))?;
        if bytes.is_empty() {
            return Err(EnvelopeCodecError::NotUnderstood(format!(
                "{name} decodes to zero bytes"
            )));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let envelope = Envelope::from_parts(b"wrapped-key-bytes", b"ciphertext-bytes");
        let encoded = envelope.encode().expect("encode should succeed");

        let decoded = Envelope::decode(&encoded).expect("decode should succeed");
        assert_eq!(decoded, envelope);
        assert_eq!(
            decoded.wrapped_key_bytes().expect("key field should decode"),
            b"wrapped-key-bytes"
        );
        assert_eq!(
            decoded.message_bytes().expect("message field should decode"),
            b"ciphertext-bytes"
        );
    }

    #[test]
    fn decode_rejects_non_base64_input() {
        let result = Envelope::decode("not-a-valid-envelope");
        assert!(matches!(result, Err(EnvelopeCodecError::NotUnderstood(_))));
    }

    #[test]
    fn decode_rejects_non_object_json() {
        let encoded = BASE64_STANDARD.encode(b"[1, 2, 3]");
        let result = Envelope::decode(&encoded);
        assert!(matches!(result, Err(EnvelopeCodecError::NotUnderstood(_))));
    }

    #[test]
    fn decode_rejects_missing_message_field() {
        let encoded = BASE64_STANDARD.encode(br#"{"key": "YWJj"}"#);
        let result = Envelope::decode(&encoded);
        assert!(matches!(result, Err(EnvelopeCodecError::NotUnderstood(_))));
    }

    #[test]
    fn decode_rejects_empty_fields() {
        let encoded = BASE64_STANDARD.encode(br#"{"key": "", "message": "YWJj"}"#);
        let result = Envelope::decode(&encoded);
        assert!(matches!(result, Err(EnvelopeCodecError::NotUnderstood(_))));
    }

    #[test]
    fn field_decoding_rejects_zero_byte_material() {
        let envelope = Envelope {
            key: "YWJj".into(),
            message: String::new(),
        };
        // decode() では弾かれる形だが、フィールド単体のデコードでも空素材は拒否する。
        assert!(envelope.message_bytes().is_err());
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let envelope = Envelope::from_parts(b"k", b"m");
        let encoded = format!("{}\n", envelope.encode().expect("encode should succeed"));
        assert_eq!(Envelope::decode(&encoded).expect("decode should succeed"), envelope);
    }
}
