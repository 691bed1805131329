use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};

use crate::errors::{AdapterError, AdapterResult, ErrorKind};

/// Tag value identifying a byte-sequence field in the persisted JSON format.
pub(crate) const BINARY_TAG: &str = "uint8array";

/// A raw byte sequence stored inside an entity record.
///
/// # Purpose
/// JSON has no native byte-sequence type, so a `Binary` field is written as a
/// tagged structure and restored to raw bytes on load:
///
/// ```json
/// {"type": "uint8array", "data": "<base64 text>"}
/// ```
///
/// Tagging is a property of the field's declared type. Only record fields
/// typed as `Binary` round-trip through the file-backed backend; byte
/// sequences buried inside untyped nested values are not inspected. The
/// external contract tags byte sequences one level deep, which these five
/// entities satisfy exactly.
///
/// # Key encoding
/// Raw bytes are not usable as container keys, so credential identifiers are
/// keyed by their [`Binary::to_key`] text form, a base64url encoding without
/// padding.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Creates a new `Binary` from any byte source.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Binary(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the `Binary` and returns the owned byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the bytes as base64url text without padding.
    ///
    /// This is the fixed-alphabet text form used to key authenticators by
    /// credential identifier.
    pub fn to_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    /// Decodes a base64url key back into raw bytes.
    ///
    /// # Returns
    /// * `Ok(Binary)` with the decoded bytes
    /// * `Err(AdapterError)` with `ErrorKind::EncodingError` if the text is
    ///   not valid base64url
    pub fn from_key(key: &str) -> AdapterResult<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(key).map_err(|err| {
            log::error!("Invalid credential id key {}: {}", key, err);
            AdapterError::new(
                &format!("Invalid credential id key: {}", err),
                ErrorKind::EncodingError,
            )
        })?;
        Ok(Binary(bytes))
    }
}

impl Debug for Binary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Binary({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Binary(bytes.to_vec())
    }
}

#[derive(Serialize, Deserialize)]
struct TaggedBytes {
    #[serde(rename = "type")]
    tag: String,
    data: String,
}

impl Serialize for Binary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = TaggedBytes {
            tag: BINARY_TAG.to_string(),
            data: STANDARD.encode(&self.0),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedBytes::deserialize(deserializer)?;
        if tagged.tag != BINARY_TAG {
            return Err(D::Error::custom(format!(
                "expected tag {}, found {}",
                BINARY_TAG, tagged.tag
            )));
        }
        let bytes = STANDARD
            .decode(&tagged.data)
            .map_err(|err| D::Error::custom(format!("invalid base64 data: {}", err)))?;
        Ok(Binary(bytes))
    }
}
