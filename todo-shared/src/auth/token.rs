/// Session token generation and hashing
///
/// Tokens are 32 random bytes, hex encoded (64 characters). The server keeps
/// only the SHA-256 digest; lookups hash the presented token and compare
/// digests.
///
/// # Example
///
/// ```
/// use todo_shared::auth::token::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert_eq!(token.len(), 64);
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a session token
const TOKEN_BYTES: usize = 32;

/// Length of an encoded session token
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Generates a new session token
///
/// Returns `(plaintext_token, sha256_hex)`.
pub fn generate_session_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    let token = hex::encode(bytes);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Hashes a session token with SHA-256 (hex encoded)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_format() {
        let (token, hash) = generate_session_token();

        assert_eq!(token.len(), SESSION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash.len(), 64);
        assert_ne!(token, hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_session_token().0).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_session_token("abc"), hash_session_token("abc"));
        assert_ne!(hash_session_token("abc"), hash_session_token("abd"));
        assert_eq!(
            hash_session_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
