//! Shared test helpers for `celestia-client` unit tests.

use crate::types::DataAvailabilityHeader;

/// Build a square header of `width` rows and columns whose roots are
/// `root_len` bytes long and distinct from one another.
pub fn sample_dah(width: usize, root_len: usize) -> DataAvailabilityHeader {
    let root = |seed: usize| -> Vec<u8> {
        (0..root_len)
            .map(|i| (seed.wrapping_mul(31).wrapping_add(i) % 256) as u8)
            .collect()
    };
    let rows = (0..width).map(root).collect();
    let cols = (width..2 * width).map(root).collect();
    DataAvailabilityHeader::new(rows, cols)
}

/// A `SubmitPayForBlob` receipt as the node encodes it.
pub fn sample_tx_response_json() -> serde_json::Value {
    serde_json::json!({
        "height": 42,
        "txhash": "6B4A8C",
        "data": "12260A242F63656C6573746961",
        "raw_log": "[{\"msg_index\":0,\"events\":[]}]",
        "logs": [{
            "msg_index": 0,
            "events": [
                {
                    "type": "celestia.blob.v1.EventPayForBlobs",
                    "attributes": [
                        { "key": "signer", "value": "\"celestia1xyz\"" },
                        { "key": "blob_sizes", "value": "[11]" },
                    ],
                },
                {
                    "type": "message",
                    "attributes": [{ "key": "action", "value": "/celestia.blob.v1.MsgPayForBlobs" }],
                },
            ],
        }],
        "gas_wanted": 100000,
        "gas_used": 61234,
        "tx": { "type_url": "/cosmos.tx.v1beta1.Tx", "value": "AQID" },
        "timestamp": "2022-11-02T10:15:00Z",
    })
}
