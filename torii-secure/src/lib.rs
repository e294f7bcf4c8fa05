pub mod application_service;
pub mod domain;
pub mod infrastructure;

pub use application_service::secure_channel::{
    AuthorityKeyError, AuthorityKeyProvider, RemoteAuthorityTransport, SecureChannelError,
    SecureChannelService, TransportError, PUBLIC_KEY_PATH, SITE_UPDATE_PATH,
};
pub use domain::{AuthorityKey, Envelope, TokenCheck, TokenEnvelope};
