use thiserror::Error;

/// Errors that can occur in the result-delivery layer.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("zeromq error: {0}")]
    Zmq(#[from] zeromq::ZmqError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("acknowledge timeout after {0:?}")]
    AckTimeout(std::time::Duration),
}
