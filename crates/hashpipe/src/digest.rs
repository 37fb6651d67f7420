use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Length in characters of every string returned by [`digest`]: 32 hash bytes
/// in padded base64.
pub const DIGEST_LEN: usize = 44;

/// Computes the digest of `value`.
///
/// The raw UTF-8 bytes are hashed with SHA-256 and the 32 resulting bytes are
/// rendered in standard, padded base64. The function is pure and total: every
/// input (including the empty string) maps to exactly one
/// [`DIGEST_LEN`]-character string.
///
/// # Example
///
/// ```
/// assert_eq!(
///     hashpipe::digest("hello"),
///     "LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ="
/// );
/// ```
pub fn digest(value: &str) -> String {
    let hash = Sha256::digest(value.as_bytes());
    STANDARD.encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::scope;

    #[test]
    fn matches_known_vectors() {
        assert_eq!(digest("hello"), "LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ=");
        assert_eq!(digest("angryMonkey"), "/iKaK4dQuFt0w2h6u20dpZQ7EPaM30pdx/sWN4BXIR8=");
    }

    #[test]
    fn empty_input_is_hashed() {
        assert_eq!(digest(""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    }

    #[test]
    fn multi_byte_input_is_hashed_bytewise() {
        assert_eq!(
            digest("123456789_abcdefghi_œ∑´´†¥_!@#$%^&"),
            "fl8pxxVdofm7VqZn9yZN7rPGatdBmpAH0K9yuDHIrs4="
        );
    }

    #[test]
    fn output_length_is_fixed() {
        let long = "x".repeat(1024);
        for value in ["", "a", "hello world", long.as_str()] {
            assert_eq!(digest(value).len(), DIGEST_LEN);
        }
    }

    #[test]
    fn deterministic_across_threads() {
        let expected = digest("test");
        scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (0..1000).map(|_| digest("test")).collect::<Vec<_>>()))
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap().iter().all(|d| *d == expected));
            }
        });
    }
}
