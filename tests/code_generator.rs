//! Behavioral tests for short code generation through the public API.

use shorturl::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_unique_code};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const PRIMARY_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[tokio::test]
async fn generated_codes_never_repeat_against_a_shared_store() {
    let store: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

    for _ in 0..1000 {
        let oracle = store.clone();
        let code = generate_unique_code(
            move |candidate| {
                let oracle = oracle.clone();
                async move { Ok(oracle.lock().unwrap().contains(&candidate)) }
            },
            DEFAULT_CODE_LENGTH,
        )
        .await
        .expect("generation should succeed");

        let mut committed = store.lock().unwrap();
        assert!(
            committed.insert(code.clone()),
            "code {code} was returned twice"
        );
    }
}

#[tokio::test]
async fn primary_codes_use_only_the_62_symbol_alphabet() {
    for _ in 0..50 {
        let code = generate_unique_code(|_| async { Ok(false) }, DEFAULT_CODE_LENGTH)
            .await
            .unwrap();

        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
        assert!(
            code.chars().all(|c| PRIMARY_ALPHABET.contains(c)),
            "unexpected character in {code}"
        );
    }
}

#[tokio::test]
async fn fallback_codes_are_url_safe_and_eleven_chars() {
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let code = generate_unique_code(
        move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n < 10) }
        },
        DEFAULT_CODE_LENGTH,
    )
    .await
    .unwrap();

    // Exactly ten primary probes before the fallback produced a winner.
    assert_eq!(calls.load(Ordering::SeqCst), 11);
    assert_eq!(code.len(), 11);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    for forbidden in ['=', '+', '/'] {
        assert!(!code.contains(forbidden));
    }
}
