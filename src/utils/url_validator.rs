//! Long URL validation.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Validates that `input` is an absolute http(s) URL and returns its
/// canonical serialization.
///
/// Rejects relative URLs and non-web schemes (`javascript:`, `file:`, ...).
///
/// # Errors
///
/// Returns [`AppError::Validation`] for malformed URLs or unsupported
/// schemes.
pub fn validate_long_url(input: &str) -> Result<String, AppError> {
    let parsed = Url::parse(input).map_err(|e| {
        AppError::bad_request(
            "The provided URL is not valid",
            json!({ "reason": e.to_string() }),
        )
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        scheme => Err(AppError::bad_request(
            "Only http and https URLs can be shortened",
            json!({ "scheme": scheme }),
        )),
    }
}
