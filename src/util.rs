use std::borrow::Cow;

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const NONCE_LEN: usize = 16;

// Everything outside RFC 3986 "unreserved" is escaped inside a path segment,
// including '/', so an id can never add a segment of its own.
const TARGETS_FOR_PATH_SEGMENT: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// 16 lowercase hex characters, fresh for every request.
pub fn generate_nonce() -> String {
    let mut nonce = Uuid::new_v4().simple().to_string();
    nonce.truncate(NONCE_LEN);
    nonce
}

/// Current Unix time in whole seconds.
pub fn timestamp_now() -> i64 {
    Utc::now().timestamp()
}

/// `https://{hostname}{endpoint}`.
///
/// The returned text is what gets signed, so it is the formatted string
/// itself; parsing only rejects targets that could never be sent.
pub fn target_url(hostname: &str, endpoint: &str) -> Result<String> {
    let url = format!("https://{}{}", hostname, endpoint);
    url::Url::parse(&url).map_err(|source| Error::InvalidUrl {
        url: url.clone(),
        source,
    })?;
    Ok(url)
}

/// Pretty-print a response body when it is JSON, otherwise return it as is.
pub fn pretty_body(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}

pub fn encode_path_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, TARGETS_FOR_PATH_SEGMENT).into()
}

#[test]
fn test_generate_nonce() {
    let a = generate_nonce();
    let b = generate_nonce();
    assert_eq!(a.len(), NONCE_LEN);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_ne!(a, b);
}

#[test]
fn test_target_url() {
    assert_eq!(
        target_url("wholesale.sandbox1.nuorder.com", "/api/schemas").unwrap(),
        "https://wholesale.sandbox1.nuorder.com/api/schemas"
    );
    // the endpoint is appended verbatim, query included
    assert_eq!(
        target_url("example.com", "/api/products?limit=5").unwrap(),
        "https://example.com/api/products?limit=5"
    );
    assert!(matches!(
        target_url("bad host", "/api/schemas"),
        Err(Error::InvalidUrl { .. })
    ));
}

#[test]
fn test_pretty_body() {
    assert_eq!(
        pretty_body(r#"{"error":"not found"}"#),
        "{\n  \"error\": \"not found\"\n}"
    );
    assert_eq!(pretty_body("<html>oops</html>"), "<html>oops</html>");
    assert_eq!(pretty_body(""), "");
}

#[test]
fn test_encode_path_segment() {
    assert_eq!(encode_path_segment("5a1b2c"), "5a1b2c");
    assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
}
