//! Serde helpers for the node's JSON conventions.
//!
//! The node encodes byte slices as standard base64 strings and nil slices as
//! `null`. These helpers map both onto plain `Vec`s so callers never see the
//! nil/empty distinction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn decode_bytes(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded.as_bytes())
}

/// Deserialize `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// A single byte slice as a base64 string.
pub(crate) mod base64_bytes {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_bytes(bytes))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Vec::new()),
            Some(encoded) => decode_bytes(&encoded).map_err(serde::de::Error::custom),
        }
    }
}

/// A list of byte slices as an array of base64 strings.
pub(crate) mod base64_list {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(
        items: &[Vec<u8>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(|bytes| encode_bytes(bytes)))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
        encoded
            .unwrap_or_default()
            .into_iter()
            .map(|item| match item {
                None => Ok(Vec::new()),
                Some(s) => decode_bytes(&s).map_err(serde::de::Error::custom),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "base64_bytes", default)]
        one: Vec<u8>,
        #[serde(with = "base64_list", default)]
        many: Vec<Vec<u8>>,
    }

    #[test]
    fn encodes_bytes_as_standard_base64() {
        let value = Wrapper {
            one: vec![0xde, 0xad, 0xbe, 0xef],
            many: vec![vec![1, 2, 3], Vec::new()],
        };
        let json = serde_json::to_value(&value).expect("must serialize");
        assert_eq!(
            json,
            serde_json::json!({ "one": "3q2+7w==", "many": ["AQID", ""] })
        );
    }

    #[test]
    fn null_and_missing_decode_as_empty() {
        let decoded: Wrapper =
            serde_json::from_str(r#"{"one": null, "many": null}"#).expect("must decode nulls");
        assert!(decoded.one.is_empty());
        assert!(decoded.many.is_empty());

        let decoded: Wrapper = serde_json::from_str("{}").expect("must decode missing fields");
        assert!(decoded.many.is_empty());
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = serde_json::from_str::<Wrapper>(r#"{"one": "not base64!"}"#)
            .expect_err("must reject invalid base64");
        assert!(err.to_string().contains("Invalid"));
    }
}
