pub mod port;
pub mod service;

pub use port::{
    AuthorityKeyError, AuthorityKeyProvider, RemoteAuthorityTransport, SecureChannelError,
    TransportError, PUBLIC_KEY_PATH, SITE_UPDATE_PATH,
};
pub use service::SecureChannelService;
