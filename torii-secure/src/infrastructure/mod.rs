pub mod crypto;
pub mod key_cache;
pub mod transport;

pub use key_cache::CachedAuthorityKeyProvider;
pub use transport::InMemoryAuthorityTransport;
