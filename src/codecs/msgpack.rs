//! MessagePack Codec using `rmp-serde`
//!
//! Compact binary alternative to [`JsonCodec`](super::JsonCodec). Values are
//! self-describing, so JSON objects, arrays and `null` survive a round trip.

use crate::error::{CacheError, Result};
use crate::traits::CacheCodec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// MessagePack Codec using `rmp-serde`
#[cfg_attr(docsrs, doc(cfg(feature = "msgpack")))]
#[derive(Debug, Default, Clone)]
pub struct MsgPackCodec;

impl CacheCodec for MsgPackCodec {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(value).map_err(|e| CacheError::codec(self.name(), e))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        rmp_serde::from_slice(bytes).map_err(|e| CacheError::codec(self.name(), e))
    }

    fn name(&self) -> &'static str {
        "msgpack"
    }
}
