//! Transaction receipt types returned by the `state` namespace.
//!
//! Mirrors the cosmos-sdk `TxResponse` tree with the same JSON tags. Fields
//! tagged `omitempty` upstream are skipped on encode when empty and default
//! when missing; `logs`, `events` and `attributes` are always present and a
//! `null` list decodes as empty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, base64_bytes, is_zero};
use crate::error::ClientError;

// ==============================================================================
// Fee
// ==============================================================================

/// Fee amount in the chain's base denomination.
///
/// Encoded as a decimal string, matching the node's arbitrary-precision
/// integer type. Plain JSON numbers are accepted when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fee(pub u128);

impl From<u64> for Fee {
    fn from(amount: u64) -> Self {
        Self(u128::from(amount))
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fee {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Self)
            .map_err(|e| ClientError::InvalidData(format!("invalid fee `{s}`: {e}")))
    }
}

impl Serialize for Fee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Repr::Number(n) => Ok(Self::from(n)),
        }
    }
}

// ==============================================================================
// Transaction Response
// ==============================================================================

/// Result of broadcasting a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    /// Block height the transaction was included at.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i64,
    #[serde(rename = "txhash", default, skip_serializing_if = "String::is_empty")]
    pub tx_hash: String,
    /// Namespace of `code`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub codespace: String,
    /// Zero on success.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    /// Raw application log output; may be non-deterministic.
    #[serde(rename = "raw_log", default, skip_serializing_if = "String::is_empty")]
    pub raw_log: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub logs: AbciMessageLogs,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(rename = "gas_wanted", default, skip_serializing_if = "is_zero")]
    pub gas_wanted: i64,
    #[serde(rename = "gas_used", default, skip_serializing_if = "is_zero")]
    pub gas_used: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<Any>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

impl TxResponse {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// Events of the given type across all message logs, in log order.
    pub fn events_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a StringEvent> {
        self.logs
            .iter()
            .flat_map(|log| log.events.iter())
            .filter(move |event| event.kind == kind)
    }
}

/// A protobuf `Any`: a type URL plus the encoded message bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    #[serde(rename = "type_url", default, skip_serializing_if = "String::is_empty")]
    pub type_url: String,
    #[serde(
        with = "base64_bytes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub value: Vec<u8>,
}

// ==============================================================================
// Message Logs and Events
// ==============================================================================

pub type AbciMessageLogs = Vec<AbciMessageLog>;

/// Log of one message within a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbciMessageLog {
    #[serde(rename = "msg_index", default, skip_serializing_if = "is_zero")]
    pub msg_index: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log: String,
    /// Events emitted while executing the message.
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub events: StringEvents,
}

pub type StringEvents = Vec<StringEvent>;

/// An event whose attributes are plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEvent {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub attributes: Vec<Attribute>,
}

impl StringEvent {
    /// Value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}
