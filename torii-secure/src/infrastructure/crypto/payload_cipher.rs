use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand_core::{OsRng, RngCore};

use crate::domain::EnvelopeCipherError;

/// ペイロード暗号化鍵の長さ（AES-256）。
pub const PAYLOAD_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// メッセージごとに使い捨てる AES-256-GCM のペイロード鍵。
///
/// - 暗号文はノンス + 暗号文の形で連結して扱う。
/// - ドロップ時に鍵バイトをゼロ化する。
pub struct PayloadKey([u8; PAYLOAD_KEY_LEN]);

impl PayloadKey {
    /// OS 乱数から新しい鍵を生成する。
    pub fn generate() -> Self {
        let mut bytes = [0u8; PAYLOAD_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// ラップ解除済みの鍵バイト列から復元する。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeCipherError> {
        let bytes: [u8; PAYLOAD_KEY_LEN] = bytes.try_into().map_err(|_| {
            EnvelopeCipherError::InvalidInput(format!(
                "payload key must be {PAYLOAD_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// ペイロードを暗号化する。戻り値はノンス + 暗号文。
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeCipherError> {
        let cipher = Aes256Gcm::new_from_slice(&self.0)
            .map_err(|_| EnvelopeCipherError::InvalidInput("invalid AES key length".into()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let encrypted = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| EnvelopeCipherError::CryptoError("AES-GCM encryption failed".into()))?;

        let mut result = Vec::with_capacity(NONCE_LEN + encrypted.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&encrypted);
        Ok(result)
    }

    /// ノンス + 暗号文形式のペイロードを復号する。
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, EnvelopeCipherError> {
        if sealed.len() <= NONCE_LEN {
            return Err(EnvelopeCipherError::InvalidInput(
                "ciphertext is shorter than the nonce".into(),
            ));
        }
        let cipher = Aes256Gcm::new_from_slice(&self.0)
            .map_err(|_| EnvelopeCipherError::InvalidInput("invalid AES key length".into()))?;
        let nonce = Nonce::from_slice(&sealed[..NONCE_LEN]);
        cipher
            .decrypt(nonce, &sealed[NONCE_LEN..])
            .map_err(|_| EnvelopeCipherError::CryptoError("AES-GCM decryption failed".into()))
    }
}

impl Drop for PayloadKey {
    fn drop(&mut self) {
        for byte in self.0.iter_mut() {
            *byte = 0;
        }
    }
}
