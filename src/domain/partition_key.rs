//! Random partition keys for published records.
//!
//! Keys carry no relationship to record content. Each key is ten random
//! alphanumeric characters, hashed with SHA-256 and hex-encoded, which
//! spreads records over the stream's shards.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random seed string before hashing.
pub const SEED_LEN: usize = 10;

/// Length of every generated key (hex-encoded SHA-256 digest).
pub const KEY_LEN: usize = 64;

/// Generates a fresh partition key.
pub fn generate() -> String {
    let seed: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SEED_LEN)
        .map(char::from)
        .collect();
    hash_seed(&seed)
}

/// Hashes a seed into its hex-encoded SHA-256 form.
pub fn hash_seed(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true when `key` looks like a generated key.
pub fn is_well_formed(key: &str) -> bool {
    key.len() == KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_keys_are_lowercase_hex() {
        for _ in 0..200 {
            let key = generate();
            assert_eq!(key.len(), KEY_LEN);
            assert!(is_well_formed(&key), "malformed key: {}", key);
        }
    }

    #[test]
    fn test_hash_seed_known_digest() {
        // SHA256("") is a fixed constant.
        assert_eq!(
            hash_seed(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hash_seed("abc").len(), KEY_LEN);
    }

    #[test]
    fn test_keys_are_independent() {
        let keys: HashSet<String> = (0..500).map(|_| generate()).collect();
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn test_is_well_formed_rejects_bad_keys() {
        assert!(!is_well_formed("abc"));
        assert!(!is_well_formed(&"G".repeat(KEY_LEN)));
        assert!(!is_well_formed(&"A".repeat(KEY_LEN)));
        assert!(is_well_formed(&"0".repeat(KEY_LEN)));
    }
}
