use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DataAvailabilityHeader, NamespaceId, NamespacedShares};

use super::protocol::param;
use super::{RpcConnection, ShareApi};

/// [`ShareApi`] over a `share` connection.
#[derive(Debug, Clone)]
pub struct ShareModule {
    connection: Arc<RpcConnection>,
}

impl ShareModule {
    pub fn new(connection: Arc<RpcConnection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &RpcConnection {
        &self.connection
    }
}

#[async_trait]
impl ShareApi for ShareModule {
    async fn get_shares_by_namespace(
        &self,
        dah: &DataAvailabilityHeader,
        namespace_id: &NamespaceId,
    ) -> Result<NamespacedShares> {
        let params = vec![param(dah)?, param(namespace_id)?];
        Ok(self
            .connection
            .call("GetSharesByNamespace", params)
            .await?)
    }
}
