//! Codec Module
//!
//! Converts cached values to byte sequences and back. The cache treats the
//! codec as swappable and never inspects the bytes it produces.

mod json;

pub use json::JsonCodec;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;

// == Codec Trait ==
/// Format-agnostic value codec.
///
/// The reader names the expected type at `deserialize` time; the stored bytes
/// carry no type tag.
pub trait Codec: Send + Sync {
    /// Serializes a value into bytes.
    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    /// Deserializes bytes into a value of type `T`.
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}
