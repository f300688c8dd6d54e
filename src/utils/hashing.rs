//! Stable hashing for run fingerprints

use sha2::{Digest, Sha256};

/// Hex SHA-256 over the arguments, one per line, truncated to 16 characters.
pub fn args_fingerprint<S: AsRef<str>>(args: &[S]) -> String {
    let mut hasher = Sha256::new();
    for arg in args {
        hasher.update(arg.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}
