use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RpcError;

#[derive(Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    id: Option<Value>,
    // An explicit `"result": null` is `Some(Null)`; a missing key is `None`.
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    pub(super) error: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    /// Unwrap the envelope of the reply to request `expected_id`.
    ///
    /// An error object wins. Otherwise the id must echo the request and a
    /// `result` key must be present.
    pub(super) fn into_result(self, expected_id: u64) -> Result<Value, RpcError> {
        if let Some(err) = self.error {
            return Err(parse_jsonrpc_error(err));
        }
        match self.id {
            Some(Value::Number(n)) if n.as_u64() == Some(expected_id) => {}
            other => {
                return Err(RpcError::InvalidResponse(format!(
                    "response id {} does not match request id {expected_id}",
                    other.unwrap_or(Value::Null)
                )));
            }
        }
        self.result.ok_or_else(|| {
            RpcError::InvalidResponse("response carries neither result nor error".to_owned())
        })
    }
}

/// Encode one positional parameter.
pub(crate) fn param<T: Serialize + ?Sized>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(RpcError::Encode)
}

/// Parse a JSON-RPC error value into a structured `RpcError`.
///
/// Errors shaped `{"code": <int>, "message": <string>}` become `ServerError`;
/// anything else is reported as `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: Value) -> RpcError {
    #[derive(Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}
