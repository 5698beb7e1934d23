//! JSON Codec
//!
//! Default codec backed by serde_json.

use serde::{de::DeserializeOwned, Serialize};

use super::Codec;
use crate::error::CodecError;

// == JSON Codec ==
/// Stores values as compact JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value).map_err(CodecError::Encode)
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        name: String,
    }

    #[test]
    fn test_struct_roundtrip() {
        let codec = JsonCodec::new();
        let row = Row {
            id: 7,
            name: "alice".to_string(),
        };

        let bytes = codec.serialize(&row).unwrap();
        let decoded: Row = codec.deserialize(&bytes).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_none_is_stored_as_null() {
        let codec = JsonCodec::new();
        let bytes = codec.serialize(&None::<u32>).unwrap();
        assert_eq!(bytes, b"null");

        let decoded: Option<u32> = codec.deserialize(&bytes).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_encode_failure() {
        let codec = JsonCodec::new();
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        let result = codec.serialize(&map);
        assert!(matches!(result, Err(CodecError::Encode(_))));
    }

    #[test]
    fn test_decode_wrong_type() {
        let codec = JsonCodec::new();
        let bytes = codec.serialize("text").unwrap();

        let result: Result<u64, _> = codec.deserialize(&bytes);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
