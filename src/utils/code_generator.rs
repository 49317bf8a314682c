//! Unique short code generation.
//!
//! The generator has no storage dependency of its own: the caller supplies an
//! async uniqueness oracle, so the algorithm is testable against a plain
//! in-memory set and works the same against the database-backed oracle.

use crate::error::AppError;
use base64::Engine as _;
use std::future::Future;

/// Default length of a generated short code.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Mixed-case alphanumeric alphabet for primary-phase codes.
const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Primary-phase attempts before switching to the high-entropy fallback.
const PRIMARY_ATTEMPTS: usize = 10;

/// Fallback codes never exceed this length.
const FALLBACK_MAX_LENGTH: usize = 11;

/// Generates a short code guaranteed unique according to `exists`.
///
/// Two phases:
///
/// 1. **Primary** - up to 10 candidates of `length` uniformly random
///    characters from `[a-zA-Z0-9]`; the first one the oracle rejects wins.
/// 2. **Fallback** - entered only when all primary candidates collide:
///    a fresh 128-bit random identifier, URL-safe base64 encoded without
///    padding and truncated to `min(length, 11)` characters, retried until
///    the oracle rejects one. At 128 bits of entropy a collision is
///    astronomically unlikely, so the loop terminates in practice.
///
/// The oracle may itself race with concurrent generation: two calls can both
/// observe a candidate as free and try to persist it. The storage layer's
/// unique constraint resolves that race; see
/// [`crate::application::services::LinkService`] for the bounded retry.
///
/// # Errors
///
/// Propagates any error returned by the oracle.
pub async fn generate_unique_code<F, Fut>(exists: F, length: usize) -> Result<String, AppError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for _ in 0..PRIMARY_ATTEMPTS {
        let candidate = random_code(length);
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    tracing::warn!(
        "Exhausted {} primary code attempts, switching to fallback identifiers",
        PRIMARY_ATTEMPTS
    );

    loop {
        let candidate = fallback_code(length);
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
}

/// Draws `length` independent uniform characters from [`ALPHABET`].
fn random_code(length: usize) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Encodes a fresh 128-bit random identifier as URL-safe base64 (no `=`,
/// `+` or `/`), truncated to `min(length, 11)` characters.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
fn fallback_code(length: usize) -> String {
    let mut buffer = [0u8; 16];
    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    encoded.truncate(length.min(FALLBACK_MAX_LENGTH));
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn is_primary_alphabet(code: &str) -> bool {
        code.bytes().all(|b| ALPHABET.contains(&b))
    }

    fn is_url_safe(code: &str) -> bool {
        code.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    #[tokio::test]
    async fn test_generated_codes_have_default_length_and_alphabet() {
        let code = generate_unique_code(|_| async { Ok(false) }, DEFAULT_CODE_LENGTH)
            .await
            .unwrap();

        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
        assert!(is_primary_alphabet(&code));
    }

    #[tokio::test]
    async fn test_generated_codes_respect_custom_length() {
        let code = generate_unique_code(|_| async { Ok(false) }, 4).await.unwrap();
        assert_eq!(code.len(), 4);
    }

    #[tokio::test]
    async fn test_codes_are_unique_against_shared_oracle() {
        let seen: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

        for _ in 0..500 {
            let oracle = seen.clone();
            let code = generate_unique_code(
                move |candidate| {
                    let oracle = oracle.clone();
                    async move { Ok(oracle.lock().unwrap().contains(&candidate)) }
                },
                DEFAULT_CODE_LENGTH,
            )
            .await
            .unwrap();

            assert!(
                seen.lock().unwrap().insert(code),
                "generator returned a code the oracle already knew"
            );
        }
    }

    #[tokio::test]
    async fn test_all_primary_collisions_force_fallback() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let code = generate_unique_code(
            move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                // Every primary candidate collides; the first fallback is free.
                async move { Ok(n < PRIMARY_ATTEMPTS) }
            },
            DEFAULT_CODE_LENGTH,
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), PRIMARY_ATTEMPTS + 1);
        assert_eq!(code.len(), FALLBACK_MAX_LENGTH);
        assert!(is_url_safe(&code));
        assert!(!code.contains('='));
        assert!(!code.contains('+'));
        assert!(!code.contains('/'));
    }

    #[tokio::test]
    async fn test_fallback_truncates_to_requested_length() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let code = generate_unique_code(
            move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n < PRIMARY_ATTEMPTS) }
            },
            5,
        )
        .await
        .unwrap();

        assert_eq!(code.len(), 5);
    }

    #[tokio::test]
    async fn test_oracle_errors_propagate() {
        let result = generate_unique_code(
            |_| async {
                Err(AppError::internal(
                    "oracle down",
                    serde_json::json!({}),
                ))
            },
            DEFAULT_CODE_LENGTH,
        )
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_code_is_url_safe_at_full_length() {
        for _ in 0..100 {
            let code = fallback_code(DEFAULT_CODE_LENGTH.max(FALLBACK_MAX_LENGTH));
            assert_eq!(code.len(), FALLBACK_MAX_LENGTH);
            assert!(is_url_safe(&code));
        }
    }

    #[test]
    fn test_random_code_distribution_is_not_degenerate() {
        let codes: HashSet<String> = (0..1000).map(|_| random_code(DEFAULT_CODE_LENGTH)).collect();
        assert_eq!(codes.len(), 1000);
    }
}
