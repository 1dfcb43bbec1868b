//! Page Codec
//!
//! bincode serialization with optional zlib compression.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PageStoreError, Result};

/// Highest zlib level; larger configured levels are clamped to it
const MAX_LEVEL: u32 = 9;

/// Encodes and decodes page blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCodec {
    /// zlib level, 0 = store uncompressed
    level: u32,
}

impl PageCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn compresses(&self) -> bool {
        self.level != 0
    }

    /// Serialize a value, compressing it when a level is set
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let raw = bincode::serialize(value)?;
        if !self.compresses() {
            return Ok(raw);
        }

        let level = Compression::new(self.level.min(MAX_LEVEL));
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), level);
        encoder
            .write_all(&raw)
            .map_err(|e| PageStoreError::Compression(format!("zlib write error: {}", e)))?;
        encoder
            .finish()
            .map_err(|e| PageStoreError::Compression(format!("zlib finish error: {}", e)))
    }

    /// Deserialize a blob written at any compression level
    ///
    /// A failed zlib decode means the blob was stored uncompressed.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match inflate(bytes) {
            Some(raw) => Ok(bincode::deserialize(&raw)?),
            None => Ok(bincode::deserialize(bytes)?),
        }
    }
}

fn inflate(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw).ok()?;
    Some(raw)
}
