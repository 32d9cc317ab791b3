//! JSON-RPC client for a data-availability node.
//!
//! [`Client`] opens one connection per API namespace (`state`, `header`,
//! `share`) and exposes their operations as async methods through the
//! [`StateApi`], [`HeaderApi`] and [`ShareApi`] traits. The [`types`] and
//! [`tx`] modules hold the response shapes.

mod codec;
pub mod client;
pub mod error;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod tx;
pub mod types;

pub use client::{Client, ClientOptions};
pub use error::{ClientError, Result, RpcError};
pub use rpc::{HeaderApi, Namespace, ShareApi, StateApi};
pub use tx::{Fee, TxResponse};
pub use types::{
    DataAvailabilityHeader, ExtendedHeader, NamespaceId, NamespacedRow, NamespacedShares, Proof,
};
