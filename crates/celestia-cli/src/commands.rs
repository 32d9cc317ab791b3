use celestia_client::{ExtendedHeader, HeaderApi, ShareApi, StateApi};
use eyre::{eyre, WrapErr};
use futures::future::try_join_all;
use serde_json::{json, Value};

use crate::cli::Command;

/// Run one command against the node and return what should be printed.
pub async fn run<C>(client: &C, command: &Command) -> eyre::Result<Value>
where
    C: StateApi + HeaderApi + ShareApi,
{
    match command {
        Command::Head => {
            let head = client.head().await.context("fetch head")?;
            Ok(serde_json::to_value(head)?)
        }
        Command::Header { heights } => {
            let headers = try_join_all(heights.iter().map(|&height| client.get_by_height(height)))
                .await
                .context("fetch headers")?;
            tracing::debug!(count = headers.len(), "fetched headers");
            match headers.as_slice() {
                [single] => Ok(serde_json::to_value(single)?),
                _ => Ok(serde_json::to_value(headers)?),
            }
        }
        Command::Shares { height, namespace } => {
            let header: ExtendedHeader = client
                .get_by_height(*height)
                .await
                .with_context(|| format!("fetch header at height {height}"))?;
            let dah = header
                .dah
                .ok_or_else(|| eyre!("header at height {height} carries no availability header"))?;

            let shares = client
                .get_shares_by_namespace(&dah, namespace)
                .await
                .with_context(|| format!("fetch shares for namespace {namespace}"))?;
            tracing::info!(
                height,
                %namespace,
                rows = shares.len(),
                shares = shares.share_count(),
                "fetched namespaced shares"
            );

            Ok(json!({
                "height": height,
                "namespace": namespace.to_string(),
                "row_count": shares.len(),
                "share_count": shares.share_count(),
                "rows": shares,
            }))
        }
        Command::Submit {
            namespace,
            data,
            hex: is_hex,
            fee,
            gas_limit,
        } => {
            let blob = if *is_hex {
                hex::decode(data.trim_start_matches("0x")).context("decode hex blob data")?
            } else {
                data.as_bytes().to_vec()
            };
            let receipt = client
                .submit_pay_for_blob(namespace, &blob, *fee, *gas_limit)
                .await
                .context("submit pay-for-blob")?;
            if receipt.is_ok() {
                tracing::info!(txhash = %receipt.tx_hash, height = receipt.height, "blob submitted");
            } else {
                tracing::warn!(
                    code = receipt.code,
                    codespace = %receipt.codespace,
                    raw_log = %receipt.raw_log,
                    "transaction failed"
                );
            }
            Ok(serde_json::to_value(receipt)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use celestia_client::{
        ClientError, DataAvailabilityHeader, Fee, NamespaceId, NamespacedRow, NamespacedShares,
        RpcError, TxResponse,
    };

    use super::*;

    /// Canned node: heights up to `tip` exist, one namespace has one row.
    struct StubNode {
        tip: u64,
        submitted: Mutex<Vec<(Vec<u8>, Fee, u64)>>,
    }

    impl StubNode {
        fn new(tip: u64) -> Self {
            Self {
                tip,
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn header() -> ExtendedHeader {
            ExtendedHeader {
                dah: Some(DataAvailabilityHeader::new(
                    vec![vec![1; 32]; 2],
                    vec![vec![2; 32]; 2],
                )),
            }
        }
    }

    #[async_trait]
    impl HeaderApi for StubNode {
        async fn get_by_height(&self, height: u64) -> celestia_client::Result<ExtendedHeader> {
            if height > self.tip {
                return Err(ClientError::Rpc(RpcError::ServerError {
                    code: 1,
                    message: "header: given height is from the future".to_owned(),
                }));
            }
            Ok(Self::header())
        }

        async fn head(&self) -> celestia_client::Result<ExtendedHeader> {
            Ok(Self::header())
        }
    }

    #[async_trait]
    impl ShareApi for StubNode {
        async fn get_shares_by_namespace(
            &self,
            _dah: &DataAvailabilityHeader,
            namespace_id: &NamespaceId,
        ) -> celestia_client::Result<NamespacedShares> {
            if namespace_id.as_bytes() == [0u8, 0, 0, 0, 0, 0, 0, 1] {
                return Ok(NamespacedShares::new(vec![NamespacedRow {
                    shares: vec![b"share-a".to_vec(), b"share-b".to_vec()],
                    proof: None,
                }]));
            }
            Ok(NamespacedShares::default())
        }
    }

    #[async_trait]
    impl StateApi for StubNode {
        async fn submit_pay_for_blob(
            &self,
            _namespace_id: &NamespaceId,
            data: &[u8],
            fee: Fee,
            gas_limit: u64,
        ) -> celestia_client::Result<TxResponse> {
            self.submitted
                .lock()
                .expect("lock")
                .push((data.to_vec(), fee, gas_limit));
            Ok(TxResponse {
                height: 9,
                tx_hash: "C0FFEE".to_owned(),
                ..TxResponse::default()
            })
        }
    }

    fn namespace(hex: &str) -> NamespaceId {
        hex.parse().expect("namespace must parse")
    }

    #[tokio::test]
    async fn header_with_one_height_prints_object() {
        let node = StubNode::new(10);
        let out = run(&node, &Command::Header { heights: vec![3] })
            .await
            .expect("header must succeed");
        assert!(out.is_object());
        assert_eq!(out["dah"]["row_roots"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn header_with_many_heights_prints_array() {
        let node = StubNode::new(10);
        let out = run(&node, &Command::Header { heights: vec![1, 2, 3] })
            .await
            .expect("headers must succeed");
        assert_eq!(out.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn header_past_tip_fails_with_context() {
        let node = StubNode::new(10);
        let err = run(&node, &Command::Header { heights: vec![5, 11] })
            .await
            .expect_err("future height must fail");
        assert!(format!("{err:?}").contains("from the future"));
    }

    #[tokio::test]
    async fn shares_reports_counts() {
        let node = StubNode::new(10);
        let out = run(
            &node,
            &Command::Shares {
                height: 4,
                namespace: namespace("0000000000000001"),
            },
        )
        .await
        .expect("shares must succeed");
        assert_eq!(out["row_count"], 1);
        assert_eq!(out["share_count"], 2);
        assert_eq!(out["namespace"], "0000000000000001");
    }

    #[tokio::test]
    async fn shares_for_absent_namespace_is_empty() {
        let node = StubNode::new(10);
        let out = run(
            &node,
            &Command::Shares {
                height: 4,
                namespace: namespace("00000000000000ff"),
            },
        )
        .await
        .expect("empty namespace must succeed");
        assert_eq!(out["row_count"], 0);
        assert_eq!(out["rows"], json!([]));
    }

    #[tokio::test]
    async fn submit_decodes_hex_data() {
        let node = StubNode::new(10);
        let out = run(
            &node,
            &Command::Submit {
                namespace: namespace("0000000000000001"),
                data: "0x68656c6c6f".to_owned(),
                hex: true,
                fee: Fee::from(2_000u64),
                gas_limit: 80_000,
            },
        )
        .await
        .expect("submit must succeed");
        assert_eq!(out["txhash"], "C0FFEE");

        let submitted = node.submitted.lock().expect("lock");
        assert_eq!(submitted[0], (b"hello".to_vec(), Fee::from(2_000u64), 80_000));
    }

    #[tokio::test]
    async fn submit_rejects_bad_hex() {
        let node = StubNode::new(10);
        let err = run(
            &node,
            &Command::Submit {
                namespace: namespace("0000000000000001"),
                data: "xyz".to_owned(),
                hex: true,
                fee: Fee::default(),
                gas_limit: 1,
            },
        )
        .await
        .expect_err("bad hex must fail");
        assert!(err.to_string().contains("decode hex blob data"));
        assert!(node.submitted.lock().expect("lock").is_empty());
    }
}
