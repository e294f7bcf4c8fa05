pub mod authority_key;
pub mod encryption;
pub mod envelope;
pub mod token;

pub use authority_key::AuthorityKey;
pub use encryption::{EnvelopeCipher, EnvelopeCipherError, SealedParts};
pub use envelope::{Envelope, EnvelopeCodecError};
pub use token::{TokenCheck, TokenEnvelope, FRESHNESS_WINDOW_SECS};
