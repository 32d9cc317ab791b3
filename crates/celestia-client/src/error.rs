use crate::rpc::Namespace;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to open {namespace} connection: {source}")]
    Connect {
        namespace: Namespace,
        #[source]
        source: RpcError,
    },

    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Failures of a single JSON-RPC round trip (or of setting one up).
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("failed to encode request params: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid connection settings: {0}")]
    InvalidConfig(String),

    #[error("{namespace} connection is closed")]
    Closed { namespace: Namespace },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
