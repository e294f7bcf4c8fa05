use hpke_rs::hpke_types::{AeadAlgorithm, KdfAlgorithm, KemAlgorithm};
use hpke_rs::prelude::*;
use hpke_rs_rust_crypto::HpkeRustCrypto;
use p256::ecdsa::signature::DigestVerifier;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::{Digest, Sha256};

use super::payload_cipher::PayloadKey;
use crate::domain::{AuthorityKey, EnvelopeCipher, EnvelopeCipherError, SealedParts};

/// DHKEM-P256 の KEM 出力（非圧縮点、65 バイト）の長さ。
/// wrapped_key はこの KEM 出力とラップ済みペイロード鍵を連結したもの。
const KEM_ENC_LEN: usize = 65;

/// HPKE の info / aad に用いるコンテキストラベル。
const HPKE_CONTEXT: &[u8] = b"torii-site-update-v1";

/// HPKE (RFC 9180) + AES-256-GCM によるハイブリッド封緘実装。
///
/// - KEM: DH KEM P-256
/// - KDF: HKDF-SHA256
/// - AEAD: AES-GCM-256
///
/// 権威鍵マテリアルは P-256 のスカラー（32 バイト）として渡されることを想定する。
/// 封緘時はスカラーから公開点を導出して受信者公開鍵とし、開封時はスカラーを
/// そのまま受信者秘密値として用いる。署名検証も同じマテリアルから検証鍵を導出する。
/// 片方向ごとに別鍵を使わないのはワイヤプロトコル側の契約による。
#[derive(Debug, Default, Clone, Copy)]
pub struct HpkeEnvelopeCipher;

impl HpkeEnvelopeCipher {
    /// この実装で利用する HPKE の設定値を返す。
    fn hpke_config() -> (Mode, KemAlgorithm, KdfAlgorithm, AeadAlgorithm) {
        (
            Mode::Base,
            KemAlgorithm::DhKemP256,
            KdfAlgorithm::HkdfSha256,
            AeadAlgorithm::Aes256Gcm,
        )
    }

    /// 鍵マテリアルから封緘先の公開点（非圧縮 65 バイト）を導出する。
    fn derive_recipient_point(authority_key: &AuthorityKey) -> Result<Vec<u8>, EnvelopeCipherError> {
        let secret = p256::SecretKey::from_slice(authority_key.as_bytes()).map_err(|e| {
            EnvelopeCipherError::InvalidInput(format!("authority key is not P-256 material: {e}"))
        })?;
        let point = secret.public_key().to_encoded_point(false);
        Ok(point.as_bytes().to_vec())
    }

    /// 鍵マテリアルから署名検証鍵を導出する。
    fn verifying_key(authority_key: &AuthorityKey) -> Result<VerifyingKey, EnvelopeCipherError> {
        let signing_key = SigningKey::from_slice(authority_key.as_bytes()).map_err(|e| {
            EnvelopeCipherError::InvalidInput(format!("authority key is not P-256 material: {e}"))
        })?;
        Ok(VerifyingKey::from(&signing_key))
    }
}

impl EnvelopeCipher for HpkeEnvelopeCipher {
    fn seal(
        &self,
        plaintext: &[u8],
        authority_key: &AuthorityKey,
    ) -> Result<SealedParts, EnvelopeCipherError> {
        if plaintext.is_empty() {
            return Err(EnvelopeCipherError::InvalidInput("plaintext is empty".into()));
        }

        let payload_key = PayloadKey::generate();
        let ciphertext = payload_key.encrypt(plaintext)?;

        let pk_r = HpkePublicKey::from(Self::derive_recipient_point(authority_key)?);

        let (mode, kem, kdf, aead) = Self::hpke_config();
        let mut hpke = Hpke::<HpkeRustCrypto>::new(mode, kem, kdf, aead);

        let (enc, wrapped) = hpke
            .seal(
                &pk_r,
                HPKE_CONTEXT,
                HPKE_CONTEXT,
                payload_key.as_bytes(),
                None,
                None,
                None,
            )
            .map_err(|e| EnvelopeCipherError::CryptoError(format!("hpke seal failed: {e:?}")))?;

        let mut wrapped_key = Vec::with_capacity(enc.len() + wrapped.len());
        wrapped_key.extend_from_slice(&enc);
        wrapped_key.extend_from_slice(&wrapped);

        Ok(SealedParts {
            wrapped_key,
            ciphertext,
        })
    }

    fn open(
        &self,
        sealed: &SealedParts,
        authority_key: &AuthorityKey,
    ) -> Result<Vec<u8>, EnvelopeCipherError> {
        if sealed.wrapped_key.len() <= KEM_ENC_LEN {
            return Err(EnvelopeCipherError::InvalidInput(
                "wrapped key is too short".into(),
            ));
        }
        if sealed.ciphertext.is_empty() {
            return Err(EnvelopeCipherError::InvalidInput("ciphertext is empty".into()));
        }
        let (enc, wrapped) = sealed.wrapped_key.split_at(KEM_ENC_LEN);

        let sk_r = HpkePrivateKey::from(authority_key.as_bytes().to_vec());
        let (mode, kem, kdf, aead) = Self::hpke_config();
        let mut hpke = Hpke::<HpkeRustCrypto>::new(mode, kem, kdf, aead);

        let mut ctx = hpke
            .setup_receiver(enc, &sk_r, HPKE_CONTEXT, None, None, None)
            .map_err(|e| {
                EnvelopeCipherError::CryptoError(format!("hpke setup_receiver failed: {e:?}"))
            })?;
        let cek = ctx
            .open(HPKE_CONTEXT, wrapped)
            .map_err(|e| EnvelopeCipherError::CryptoError(format!("hpke open failed: {e:?}")))?;

        let payload_key = PayloadKey::from_bytes(&cek)?;
        payload_key.decrypt(&sealed.ciphertext)
    }

    fn verify_signature(
        &self,
        message: &[u8],
        signature: &[u8],
        authority_key: &AuthorityKey,
    ) -> Result<bool, EnvelopeCipherError> {
        let verifying_key = Self::verifying_key(authority_key)?;
        let signature = match Signature::from_slice(signature) {
            Ok(signature) => signature,
            // 長さ不正などで署名として解釈できない入力は「署名不一致」として扱う。
            Err(_) => return Ok(false),
        };
        Ok(verifying_key
            .verify_digest(Sha256::new_with_prefix(message), &signature)
            .is_ok())
    }
}
