pub mod envelope_cipher;
pub mod payload_cipher;

pub use envelope_cipher::HpkeEnvelopeCipher;
pub use payload_cipher::PayloadKey;
