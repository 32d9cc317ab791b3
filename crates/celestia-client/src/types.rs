//! Data model for header and share responses.
//!
//! These structures mirror the node's JSON shapes closely enough to decode
//! its responses without pulling in the node's own type definitions. Field
//! names on the wire are fixed by the node and must not change.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::codec::{self, base64_bytes, base64_list};
use crate::error::ClientError;

// ==============================================================================
// Namespace ID
// ==============================================================================

/// Identifier of the namespace a blob or share belongs to.
///
/// Sent as a base64 string. `Display` and `FromStr` use hex, which is how
/// namespaces are usually written by hand. An empty id is rejected both by
/// the constructors and when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NamespaceId(#[serde(with = "base64_bytes")] Vec<u8>);

impl<'de> Deserialize<'de> for NamespaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = base64_bytes::deserialize(deserializer)?;
        Self::new(bytes).map_err(de::Error::custom)
    }
}

impl NamespaceId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ClientError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ClientError::InvalidData(
                "namespace id must not be empty".to_owned(),
            ));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for NamespaceId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)
            .map_err(|e| ClientError::InvalidData(format!("invalid namespace id `{s}`: {e}")))?;
        Self::new(bytes)
    }
}

// ==============================================================================
// Content Identifiers
// ==============================================================================

/// A content identifier for a Merkle tree node, kept in its string form.
///
/// Encoded as an IPLD link object: `{"/": "<cid>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cid {
    #[serde(rename = "/")]
    link: String,
}

impl Cid {
    pub fn as_str(&self) -> &str {
        &self.link
    }
}

impl From<String> for Cid {
    fn from(link: String) -> Self {
        Self { link }
    }
}

impl From<&str> for Cid {
    fn from(link: &str) -> Self {
        Self {
            link: link.to_owned(),
        }
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.link)
    }
}

// ==============================================================================
// Data Availability Header
// ==============================================================================

/// Row and column roots of one block's extended data square.
///
/// Block data is split into shares and laid out in a square, which is then
/// extended with Reed-Solomon coding to twice its width. Each row and column
/// of the extended square is committed to by a namespaced Merkle root.
///
/// The combined hash of all roots is computed by an external algorithm; see
/// [`DataAvailabilityHeader::hash_with`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAvailabilityHeader {
    #[serde(rename = "row_roots", with = "base64_list", default)]
    row_roots: Vec<Vec<u8>>,
    #[serde(rename = "column_roots", with = "base64_list", default)]
    column_roots: Vec<Vec<u8>>,
    #[serde(skip)]
    hash: OnceLock<Vec<u8>>,
}

impl DataAvailabilityHeader {
    pub fn new(row_roots: Vec<Vec<u8>>, column_roots: Vec<Vec<u8>>) -> Self {
        Self {
            row_roots,
            column_roots,
            hash: OnceLock::new(),
        }
    }

    pub fn row_roots(&self) -> &[Vec<u8>] {
        &self.row_roots
    }

    pub fn column_roots(&self) -> &[Vec<u8>] {
        &self.column_roots
    }

    /// Width of the extended square, i.e. the number of row roots.
    pub fn square_width(&self) -> usize {
        self.row_roots.len()
    }

    /// Check the shape of the header: as many row roots as column roots, a
    /// power-of-two width, and roots of one common non-zero length.
    pub fn validate(&self) -> Result<(), ClientError> {
        let rows = self.row_roots.len();
        let cols = self.column_roots.len();
        if rows != cols {
            return Err(ClientError::InvalidData(format!(
                "row roots ({rows}) and column roots ({cols}) differ in length"
            )));
        }
        if !rows.is_power_of_two() {
            return Err(ClientError::InvalidData(format!(
                "square width {rows} is not a power of two"
            )));
        }

        let root_len = self.row_roots[0].len();
        if root_len == 0 {
            return Err(ClientError::InvalidData("roots must not be empty".to_owned()));
        }
        if let Some(bad) = self
            .row_roots
            .iter()
            .chain(&self.column_roots)
            .find(|root| root.len() != root_len)
        {
            return Err(ClientError::InvalidData(format!(
                "root of {} bytes differs from expected {root_len} bytes",
                bad.len()
            )));
        }
        Ok(())
    }

    /// Combined root hash, computed by `compute` on first use and memoized.
    ///
    /// `compute` receives the row roots and the column roots. Later calls
    /// return the memo and never invoke their closure.
    pub fn hash_with<F>(&self, compute: F) -> &[u8]
    where
        F: FnOnce(&[Vec<u8>], &[Vec<u8>]) -> Vec<u8>,
    {
        self.hash
            .get_or_init(|| compute(&self.row_roots, &self.column_roots))
    }

    pub fn cached_hash(&self) -> Option<&[u8]> {
        self.hash.get().map(Vec::as_slice)
    }
}

// The memoized hash is derived data and does not take part in equality.
impl PartialEq for DataAvailabilityHeader {
    fn eq(&self, other: &Self) -> bool {
        self.row_roots == other.row_roots && self.column_roots == other.column_roots
    }
}

impl Eq for DataAvailabilityHeader {}

// ==============================================================================
// Extended Header
// ==============================================================================

/// A block header as returned by the `header` namespace.
///
/// Only the availability commitment is decoded; the remaining consensus
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedHeader {
    #[serde(rename = "dah", default)]
    pub dah: Option<DataAvailabilityHeader>,
}

// ==============================================================================
// Shares and Proofs
// ==============================================================================

/// Inclusion proof for a contiguous range of leaves in one row.
///
/// Covers the half-open leaf range `[start, end)`. A proof with
/// `start > end` is rejected when decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProof")]
pub struct Proof {
    #[serde(rename = "Nodes")]
    nodes: Vec<Cid>,
    #[serde(rename = "Start")]
    start: usize,
    #[serde(rename = "End")]
    end: usize,
}

#[derive(Deserialize)]
struct RawProof {
    #[serde(rename = "Nodes", default, deserialize_with = "codec::null_as_default")]
    nodes: Vec<Cid>,
    #[serde(rename = "Start")]
    start: usize,
    #[serde(rename = "End")]
    end: usize,
}

impl TryFrom<RawProof> for Proof {
    type Error = ClientError;

    fn try_from(raw: RawProof) -> Result<Self, Self::Error> {
        Self::new(raw.nodes, raw.start, raw.end)
    }
}

impl Proof {
    pub fn new(nodes: Vec<Cid>, start: usize, end: usize) -> Result<Self, ClientError> {
        if start > end {
            return Err(ClientError::InvalidData(format!(
                "proof start {start} is past end {end}"
            )));
        }
        Ok(Self { nodes, start, end })
    }

    pub fn nodes(&self) -> &[Cid] {
        &self.nodes
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn leaf_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// All shares of one row that fall in the requested namespace, with their
/// inclusion proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacedRow {
    #[serde(rename = "Shares", with = "base64_list", default)]
    pub shares: Vec<Vec<u8>>,
    #[serde(rename = "Proof", default)]
    pub proof: Option<Proof>,
}

/// Shares of one namespace across a square, one entry per matching row.
///
/// An empty value means the namespace had no rows in the square; it is not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespacedShares(
    #[serde(deserialize_with = "codec::null_as_default")] Vec<NamespacedRow>,
);

impl NamespacedShares {
    pub fn new(rows: Vec<NamespacedRow>) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[NamespacedRow] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of shares across all rows.
    pub fn share_count(&self) -> usize {
        self.0.iter().map(|row| row.shares.len()).sum()
    }

    /// All shares in row order.
    pub fn flatten(&self) -> impl Iterator<Item = &[u8]> {
        self.0
            .iter()
            .flat_map(|row| row.shares.iter().map(Vec::as_slice))
    }

    pub fn into_rows(self) -> Vec<NamespacedRow> {
        self.0
    }
}

impl IntoIterator for NamespacedShares {
    type Item = NamespacedRow;
    type IntoIter = std::vec::IntoIter<NamespacedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
