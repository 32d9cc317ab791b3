use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use reqwest::header::{self, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::client::ClientOptions;
use crate::error::RpcError;

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use super::Namespace;

/// A JSON-RPC connection scoped to one API namespace.
///
/// Every method invoked through it is prefixed with the namespace name
/// (`header.Head`, `share.GetSharesByNamespace`, ...). Once closed, calls
/// fail with [`RpcError::Closed`] without touching the network.
#[derive(Debug)]
pub struct RpcConnection {
    http: reqwest::Client,
    url: String,
    namespace: Namespace,
    auth: Option<HeaderValue>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl RpcConnection {
    /// Set up a connection to `address` for `namespace`.
    ///
    /// `auth`, when present, is sent verbatim as the `Authorization` header
    /// of every request.
    pub fn open(
        address: &str,
        namespace: Namespace,
        auth: Option<HeaderValue>,
        options: &ClientOptions,
    ) -> Result<Self, RpcError> {
        let url = parse_connection(address)?;

        let http = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .tcp_nodelay(true)
            .build()?;

        debug!(
            rpc.namespace = %namespace,
            rpc.url = %url,
            authenticated = auth.is_some(),
            "opened rpc connection"
        );

        Ok(Self {
            http,
            url,
            namespace,
            auth,
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Mark the connection closed. Closing twice is a no-op.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(rpc.namespace = %self.namespace, "closed rpc connection");
        }
    }

    /// Invoke `<namespace>.<method>` with positional `params` and decode
    /// the result.
    pub(crate) async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<R, RpcError> {
        if self.is_closed() {
            return Err(RpcError::Closed {
                namespace: self.namespace,
            });
        }

        let method = format!("{}.{method}", self.namespace);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            rpc.id = id,
            rpc.method = %method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method: &method,
            params,
        };

        let mut builder = self
            .http
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some(ref auth) = self.auth {
            builder = builder.header(header::AUTHORIZATION, auth.clone());
        }

        let response = builder.send().await?;
        let status = response.status();

        let body = response.text().await?;
        debug!(rpc.id = id, rpc.method = %method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = %method, body = %body, "rpc response body");

        let decoded: JsonRpcResponse = match serde_json::from_str(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(RpcError::HttpStatus { status, body });
            }
            Err(e) => {
                return Err(RpcError::InvalidResponse(format!(
                    "decode JSON-RPC response: {e}; body={body}"
                )));
            }
        };

        // A failed status only carries meaning through a JSON-RPC error object.
        if !status.is_success() && decoded.error.is_none() {
            return Err(RpcError::HttpStatus { status, body });
        }

        let result = decoded.into_result(id)?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("decode {method} result: {e}")))
    }
}

pub(super) fn parse_connection(address: &str) -> Result<String, RpcError> {
    let parsed = Url::parse(address).map_err(|e| {
        RpcError::InvalidConfig(format!(
            "invalid address `{address}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(address.to_owned()),
        other => Err(RpcError::InvalidConfig(format!(
            "unsupported address scheme `{other}`; expected http or https"
        ))),
    }
}

/// Build the `Authorization` header value for a bearer token.
pub(crate) fn bearer_auth(token: &str) -> Result<HeaderValue, RpcError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        RpcError::InvalidConfig("auth token contains characters not allowed in a header".to_owned())
    })?;
    value.set_sensitive(true);
    Ok(value)
}
