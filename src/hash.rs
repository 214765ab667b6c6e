use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Error;

/// SHA-256 hash used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// zero hash (useful as sentinel)
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// number of hex chars shown by `short`
    pub const SHORT_LEN: usize = 7;

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// parse from hex string
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let bytes = hex::decode(s).map_err(|_| Error::InvalidHashHex(s.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidHashHex(s.to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// abbreviated hex form
    pub fn short(&self) -> String {
        self.to_hex()[..Self::SHORT_LEN].to_string()
    }

    /// whether the hex form starts with `prefix` (case-insensitive)
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 62 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..12])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// compute blob hash over the raw content
///
/// the file name plays no part, so equal content always dedups to one blob.
pub fn compute_blob_hash(content: &[u8]) -> Hash {
    Hash(Sha256::digest(content).into())
}

/// compute commit hash over its defining fields
///
/// blobs are walked in sorted path order (BTreeMap), so the result never
/// depends on insertion order.
/// format:
///   blob_count: 4 bytes LE
///   for each blob (sorted by path):
///     path_len: 4 bytes LE
///     path: bytes
///     hash: 32 bytes
///   parent_flag: 1 byte (0 = none, 1 = present), followed by 32 bytes if present
///   second_parent_flag: 1 byte, followed by 32 bytes if present
///   message_len: 4 bytes LE
///   message: bytes
///   timestamp: 8 bytes LE (signed)
pub fn compute_commit_hash(
    blobs: &BTreeMap<String, Hash>,
    parent: Option<&Hash>,
    second_parent: Option<&Hash>,
    message: &str,
    timestamp: i64,
) -> Hash {
    let mut hasher = Sha256::new();

    hasher.update((blobs.len() as u32).to_le_bytes());
    for (path, hash) in blobs {
        hasher.update((path.len() as u32).to_le_bytes());
        hasher.update(path.as_bytes());
        hasher.update(hash.as_bytes());
    }

    for link in [parent, second_parent] {
        match link {
            Some(hash) => {
                hasher.update([1u8]);
                hasher.update(hash.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }

    hasher.update((message.len() as u32).to_le_bytes());
    hasher.update(message.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    Hash(hasher.finalize().into())
}
