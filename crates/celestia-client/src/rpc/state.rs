use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::encode_bytes;
use crate::error::Result;
use crate::tx::{Fee, TxResponse};
use crate::types::NamespaceId;

use super::protocol::param;
use super::{RpcConnection, StateApi};

/// [`StateApi`] over a `state` connection.
#[derive(Debug, Clone)]
pub struct StateModule {
    connection: Arc<RpcConnection>,
}

impl StateModule {
    pub fn new(connection: Arc<RpcConnection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &RpcConnection {
        &self.connection
    }
}

#[async_trait]
impl StateApi for StateModule {
    async fn submit_pay_for_blob(
        &self,
        namespace_id: &NamespaceId,
        data: &[u8],
        fee: Fee,
        gas_limit: u64,
    ) -> Result<TxResponse> {
        let params = vec![
            param(namespace_id)?,
            serde_json::Value::String(encode_bytes(data)),
            param(&fee)?,
            serde_json::Value::from(gas_limit),
        ];
        Ok(self.connection.call("SubmitPayForBlob", params).await?)
    }
}
