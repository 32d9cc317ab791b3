//! Node RPC namespaces.
//!
//! Each API namespace the node exposes is a trait with one method per remote
//! operation ([`StateApi`], [`HeaderApi`], [`ShareApi`]) plus a module struct
//! that implements it over its own [`RpcConnection`].

mod connection;
mod header;
mod protocol;
mod share;
mod state;

pub use connection::RpcConnection;
pub use header::HeaderModule;
pub use share::ShareModule;
pub use state::StateModule;

pub(crate) use connection::bearer_auth;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::tx::{Fee, TxResponse};
use crate::types::{DataAvailabilityHeader, ExtendedHeader, NamespaceId, NamespacedShares};

// ==============================================================================
// Namespaces
// ==============================================================================

/// An API namespace on the node. Its name prefixes every method called in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    State,
    Header,
    Share,
}

impl Namespace {
    /// Every namespace, in the order a client opens (and closes) them.
    pub const ALL: [Namespace; 3] = [Self::State, Self::Header, Self::Share];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Header => "header",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Namespace APIs
// ==============================================================================

/// Operations of the `state` namespace.
#[async_trait]
pub trait StateApi: Send + Sync {
    /// Submit a transaction paying for `data` to be published under
    /// `namespace_id`.
    ///
    /// A receipt with a non-zero `code` means the node accepted the call but
    /// the transaction failed; it is returned as `Ok`.
    async fn submit_pay_for_blob(
        &self,
        namespace_id: &NamespaceId,
        data: &[u8],
        fee: Fee,
        gas_limit: u64,
    ) -> Result<TxResponse>;
}

/// Operations of the `header` namespace.
#[async_trait]
pub trait HeaderApi: Send + Sync {
    /// Header at `height`. Fails for heights past the node's chain head.
    async fn get_by_height(&self, height: u64) -> Result<ExtendedHeader>;

    /// Latest header the node knows. Fails if it has not synced one yet.
    async fn head(&self) -> Result<ExtendedHeader>;
}

/// Operations of the `share` namespace.
#[async_trait]
pub trait ShareApi: Send + Sync {
    /// All shares of `namespace_id` in the square committed to by `dah`.
    ///
    /// Returns an empty value, not an error, when no row contains the
    /// namespace.
    async fn get_shares_by_namespace(
        &self,
        dah: &DataAvailabilityHeader,
        namespace_id: &NamespaceId,
    ) -> Result<NamespacedShares>;
}
