use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;

type Sha256Digest = [u8; 32];

type HashFn = fn(&Path) -> io::Result<Sha256Digest>;

/// Byte-level equality test with a run-scoped digest cache keyed by (absolute path, length).
pub struct DuplicateDetector {
    cache: HashMap<(PathBuf, u64), Sha256Digest>,
    hash_file: HashFn,
}

impl fmt::Debug for DuplicateDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateDetector")
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::with_hasher(compute_hash)
    }
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_hasher(hash_file: HashFn) -> Self {
        Self {
            cache: HashMap::new(),
            hash_file,
        }
    }

    /// True only when both files exist, have the same length and the same SHA-256.
    /// I/O failures are logged and reported as "not equal".
    pub fn files_are_equal(&mut self, a: &Path, b: &Path) -> bool {
        let (Some(len_a), Some(len_b)) = (file_len(a), file_len(b)) else {
            return false;
        };
        if len_a != len_b {
            return false;
        }

        let digest_a = match self.digest(a, len_a) {
            Ok(d) => d,
            Err(e) => {
                warn!("Cannot hash {}: {}", a.display(), e);
                return false;
            }
        };
        let digest_b = match self.digest(b, len_b) {
            Ok(d) => d,
            Err(e) => {
                warn!("Cannot hash {}: {}", b.display(), e);
                return false;
            }
        };
        digest_a == digest_b
    }

    /// Number of cached digests.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn digest(&mut self, path: &Path, len: u64) -> io::Result<Sha256Digest> {
        let key = (std::path::absolute(path)?, len);
        if let Some(d) = self.cache.get(&key) {
            return Ok(*d);
        }
        let d = (self.hash_file)(path)?;
        self.cache.insert(key, d);
        Ok(d)
    }
}

fn file_len(path: &Path) -> Option<u64> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        Ok(_) => None,
        Err(e) => {
            warn!("Cannot stat {}: {}", path.display(), e);
            None
        }
    }
}

fn compute_hash(path: &Path) -> io::Result<Sha256Digest> {
    let mut file = File::open(path)?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().into())
}
