//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content
//! fingerprints of files using memory-efficient streaming. A fingerprint
//! is the lowercase hex SHA-256 digest of the file's bytes and is the
//! identity key for deduplication.
//!
//! # Example
//!
//! ```no_run
//! use takeout_reorg::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fingerprint = hasher.full_hash(Path::new("photo.jpg")).unwrap();
//! println!("{fingerprint}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{ReorgError, Result};

/// Buffer size for streaming hash computation (64KB)
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Hex-encoded content digest of a file.
///
/// Two files with the same fingerprint are treated as the same photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a fingerprint from its hex form.
    ///
    /// Returns `None` unless `hex` is exactly [`FINGERPRINT_LEN`] lowercase
    /// hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let valid = hex.len() == FINGERPRINT_LEN
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(hex.to_string()))
    }

    /// The hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: HASH_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Hash the entire content of a file.
    ///
    /// The file is opened, streamed and closed before returning, including
    /// when a read fails part way through.
    ///
    /// # Errors
    ///
    /// Returns [`ReorgError::Hash`] if the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<Fingerprint> {
        let file = File::open(path).map_err(|source| ReorgError::Hash {
            path: path.to_path_buf(),
            source,
        })?;

        let fingerprint = self
            .hash_reader(file)
            .map_err(|source| ReorgError::Hash {
                path: path.to_path_buf(),
                source,
            })?;

        log::trace!("Hashed {} -> {}", path.display(), fingerprint);
        Ok(fingerprint)
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
        }

        Ok(Fingerprint(format!("{:x}", hasher.finalize())))
    }
}
