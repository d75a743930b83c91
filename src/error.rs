#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("another authenticator operation is in flight")]
    Busy,
    #[error("Codec: {0}")]
    Codec(#[from] crate::codec::CodecError),
    #[error("Store: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Authenticator: {0}")]
    Gateway(#[from] crate::gateway::GatewayError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
