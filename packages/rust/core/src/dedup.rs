//! Content-addressed paragraph deduplication.
//!
//! The [`FingerprintStore`] records which paragraphs have already been
//! emitted anywhere in the crawl. It only grows, is discarded at process
//! exit, and is safe to share across any number of concurrent response
//! handlers. A single mutex over the set is sufficient: paragraph hashing
//! is never the bottleneck, network fetches are.

use std::collections::HashSet;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

/// A 128-bit digest of a trimmed paragraph's UTF-8 bytes.
///
/// Truncated SHA-256. Collision-accepting by design: the dedup key only
/// needs low collision probability at corpus scale, not cryptographic
/// strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Fingerprint a paragraph. The caller is expected to trim first;
    /// byte-identical input yields an identical fingerprint.
    pub fn of(paragraph: &str) -> Self {
        let digest = Sha256::digest(paragraph.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(bytes)
    }
}

/// Set of fingerprints emitted so far. Monotonic: no removal operation.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    set: Mutex<HashSet<Fingerprint>>,
}

impl FingerprintStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the fingerprint is already present.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.set
            .lock()
            .expect("fingerprint store poisoned")
            .contains(fingerprint)
    }

    /// Atomically check-and-insert.
    ///
    /// Returns `true` iff the fingerprint was newly inserted — this caller
    /// is the first in the whole crawl to see the content. Callers must use
    /// this single operation rather than `contains` followed by an insert:
    /// the separate sequence would let two concurrent handlers both conclude
    /// "novel" for the same paragraph.
    pub fn insert_if_absent(&self, fingerprint: Fingerprint) -> bool {
        self.set
            .lock()
            .expect("fingerprint store poisoned")
            .insert(fingerprint)
    }

    /// Number of unique paragraphs seen so far.
    pub fn len(&self) -> usize {
        self.set.lock().expect("fingerprint store poisoned").len()
    }

    /// Whether nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
