use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ExtendedHeader;

use super::{HeaderApi, RpcConnection};

/// [`HeaderApi`] over a `header` connection.
#[derive(Debug, Clone)]
pub struct HeaderModule {
    connection: Arc<RpcConnection>,
}

impl HeaderModule {
    pub fn new(connection: Arc<RpcConnection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &RpcConnection {
        &self.connection
    }
}

#[async_trait]
impl HeaderApi for HeaderModule {
    async fn get_by_height(&self, height: u64) -> Result<ExtendedHeader> {
        let params = vec![serde_json::Value::from(height)];
        Ok(self.connection.call("GetByHeight", params).await?)
    }

    async fn head(&self) -> Result<ExtendedHeader> {
        Ok(self.connection.call("Head", Vec::new()).await?)
    }
}
