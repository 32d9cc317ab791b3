//! Client composition: one handle over the `state`, `header` and `share`
//! namespaces, each backed by its own connection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ClientError, Result, RpcError};
use crate::rpc::{
    bearer_auth, HeaderApi, HeaderModule, Namespace, RpcConnection, ShareApi, ShareModule,
    StateApi, StateModule,
};
use crate::tx::{Fee, TxResponse};
use crate::types::{DataAvailabilityHeader, ExtendedHeader, NamespaceId, NamespacedShares};

// ==============================================================================
// Options
// ==============================================================================

/// HTTP settings applied to every connection of a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Upper bound on a whole request, including reading the response.
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// ==============================================================================
// Closers
// ==============================================================================

/// Closes connections across namespaces, in registration order.
#[derive(Debug, Default)]
struct MultiCloser {
    connections: Vec<Arc<RpcConnection>>,
}

impl MultiCloser {
    fn register(&mut self, connection: Arc<RpcConnection>) {
        self.connections.push(connection);
    }

    fn close_all(&self) {
        for connection in &self.connections {
            connection.close();
        }
    }
}

/// Connections acquired while a client is being built.
///
/// Dropping it closes everything acquired so far, so an early return from
/// construction never leaves connections open. [`Self::finish`] hands the
/// connections over to the finished client instead.
#[derive(Default)]
struct PendingConnections {
    closer: MultiCloser,
}

impl PendingConnections {
    fn acquire<F>(&mut self, namespace: Namespace, open: &mut F) -> Result<Arc<RpcConnection>>
    where
        F: FnMut(Namespace) -> Result<Arc<RpcConnection>, RpcError>,
    {
        let connection =
            open(namespace).map_err(|source| ClientError::Connect { namespace, source })?;
        self.closer.register(Arc::clone(&connection));
        Ok(connection)
    }

    fn finish(mut self) -> MultiCloser {
        std::mem::take(&mut self.closer)
    }
}

impl Drop for PendingConnections {
    fn drop(&mut self) {
        if !self.closer.connections.is_empty() {
            warn!(
                opened = self.closer.connections.len(),
                "client construction failed; closing opened connections"
            );
            self.closer.close_all();
        }
    }
}

// ==============================================================================
// Client
// ==============================================================================

/// Handle to a node's `state`, `header` and `share` APIs.
///
/// Holds one connection per namespace. The namespace traits are implemented
/// on the client itself by forwarding to the matching module, so a `Client`
/// can be passed anywhere a [`StateApi`], [`HeaderApi`] or [`ShareApi`] is
/// expected.
///
/// Calls may run concurrently. Call [`Client::close`] when done.
#[derive(Debug)]
pub struct Client {
    state: StateModule,
    header: HeaderModule,
    share: ShareModule,
    closer: MultiCloser,
}

impl Client {
    /// Connect to `address`, authenticating every request with `token` as a
    /// bearer token.
    pub fn new(address: &str, token: &str) -> Result<Self> {
        Self::with_options(address, Some(token), ClientOptions::default())
    }

    /// Connect to `address` without authentication.
    pub fn new_public(address: &str) -> Result<Self> {
        Self::with_options(address, None, ClientOptions::default())
    }

    pub fn with_options(address: &str, token: Option<&str>, options: ClientOptions) -> Result<Self> {
        let auth = token.map(bearer_auth).transpose()?;
        debug!(address, authenticated = auth.is_some(), "connecting client");
        connect_modules(|namespace| {
            RpcConnection::open(address, namespace, auth.clone(), &options).map(Arc::new)
        })
    }

    pub fn state(&self) -> &StateModule {
        &self.state
    }

    pub fn header(&self) -> &HeaderModule {
        &self.header
    }

    pub fn share(&self) -> &ShareModule {
        &self.share
    }

    /// Close the connections of all namespaces.
    ///
    /// Calls made afterwards fail with a `Closed` error. Closing again does
    /// nothing.
    pub fn close(&self) {
        self.closer.close_all();
    }
}

/// Open one connection per namespace and bind a module to each.
///
/// If any namespace fails to open, the ones opened before it are closed and
/// the error is returned.
fn connect_modules<F>(mut open: F) -> Result<Client>
where
    F: FnMut(Namespace) -> Result<Arc<RpcConnection>, RpcError>,
{
    let mut pending = PendingConnections::default();
    let state = pending.acquire(Namespace::State, &mut open)?;
    let header = pending.acquire(Namespace::Header, &mut open)?;
    let share = pending.acquire(Namespace::Share, &mut open)?;

    Ok(Client {
        state: StateModule::new(state),
        header: HeaderModule::new(header),
        share: ShareModule::new(share),
        closer: pending.finish(),
    })
}

#[async_trait]
impl StateApi for Client {
    async fn submit_pay_for_blob(
        &self,
        namespace_id: &NamespaceId,
        data: &[u8],
        fee: Fee,
        gas_limit: u64,
    ) -> Result<TxResponse> {
        self.state
            .submit_pay_for_blob(namespace_id, data, fee, gas_limit)
            .await
    }
}

#[async_trait]
impl HeaderApi for Client {
    async fn get_by_height(&self, height: u64) -> Result<ExtendedHeader> {
        self.header.get_by_height(height).await
    }

    async fn head(&self) -> Result<ExtendedHeader> {
        self.header.head().await
    }
}

#[async_trait]
impl ShareApi for Client {
    async fn get_shares_by_namespace(
        &self,
        dah: &DataAvailabilityHeader,
        namespace_id: &NamespaceId,
    ) -> Result<NamespacedShares> {
        self.share.get_shares_by_namespace(dah, namespace_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const ADDR: &str = "http://localhost:26658";

    fn open_ok(namespace: Namespace) -> Result<Arc<RpcConnection>, RpcError> {
        RpcConnection::open(ADDR, namespace, None, &ClientOptions::default()).map(Arc::new)
    }

    #[test]
    fn binds_every_namespace_to_its_module() {
        let client = Client::new(ADDR, "tok").expect("client must construct");
        assert_eq!(client.state().connection().namespace(), Namespace::State);
        assert_eq!(client.header().connection().namespace(), Namespace::Header);
        assert_eq!(client.share().connection().namespace(), Namespace::Share);
    }

    #[test]
    fn opens_namespaces_in_registration_order() {
        let mut order = Vec::new();
        let client = connect_modules(|namespace| {
            order.push(namespace);
            open_ok(namespace)
        })
        .expect("client must construct");
        drop(client);
        assert_eq!(order, Namespace::ALL);
    }

    #[test]
    fn failed_namespace_closes_earlier_connections() {
        let opened: Mutex<Vec<Arc<RpcConnection>>> = Mutex::new(Vec::new());

        let err = connect_modules(|namespace| {
            if namespace == Namespace::Share {
                return Err(RpcError::InvalidConfig("share refused".to_owned()));
            }
            let connection = open_ok(namespace)?;
            opened.lock().expect("lock").push(Arc::clone(&connection));
            Ok(connection)
        })
        .expect_err("construction must fail");

        assert!(matches!(
            err,
            ClientError::Connect {
                namespace: Namespace::Share,
                ..
            }
        ));
        let opened = opened.into_inner().expect("lock");
        assert_eq!(opened.len(), 2);
        assert!(opened.iter().all(|conn| conn.is_closed()));
    }

    #[test]
    fn first_namespace_failure_opens_nothing() {
        let mut attempts = 0;
        let err = connect_modules(|_| {
            attempts += 1;
            Err(RpcError::InvalidConfig("refused".to_owned()))
        })
        .expect_err("construction must fail");
        assert_eq!(attempts, 1);
        assert!(matches!(
            err,
            ClientError::Connect {
                namespace: Namespace::State,
                ..
            }
        ));
    }

    #[test]
    fn successful_construction_leaves_connections_open() {
        let client = Client::new_public(ADDR).expect("client must construct");
        assert!(!client.state().connection().is_closed());
        assert!(!client.header().connection().is_closed());
        assert!(!client.share().connection().is_closed());
    }

    #[test]
    fn close_twice_closes_all_without_panicking() {
        let client = Client::new(ADDR, "tok").expect("client must construct");
        client.close();
        client.close();
        assert!(client.state().connection().is_closed());
        assert!(client.header().connection().is_closed());
        assert!(client.share().connection().is_closed());
    }

    #[test]
    fn invalid_address_is_a_connect_error() {
        let err = Client::new_public("ftp://example.com").expect_err("must reject ftp");
        assert!(matches!(
            err,
            ClientError::Connect {
                namespace: Namespace::State,
                source: RpcError::InvalidConfig(_),
            }
        ));
    }

    #[test]
    fn invalid_token_is_rejected_before_connecting() {
        let err = Client::new(ADDR, "bad\ntoken").expect_err("must reject token");
        assert!(matches!(err, ClientError::Rpc(RpcError::InvalidConfig(_))));
    }

    #[test]
    fn options_builder_overrides_defaults() {
        let options = ClientOptions::default()
            .with_connect_timeout(Duration::from_secs(1))
            .with_request_timeout(Duration::from_secs(2));
        assert_eq!(options.connect_timeout, Duration::from_secs(1));
        assert_eq!(options.request_timeout, Duration::from_secs(2));
        Client::with_options(ADDR, None, options).expect("client must construct");
    }
}
