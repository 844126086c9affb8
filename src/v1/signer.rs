use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::parameters::Parameters;
use crate::v1::values::OAUTH_HEADER;

type HmacSha1 = Hmac<Sha1>;

/// String to sign: `{METHOD}{URL}?{k=v&k=v...}`.
///
/// The marketplace does not follow RFC 5849 here: nothing is percent-encoded
/// and the pairs keep their given order. Its verifier rebuilds exactly this
/// text, so it must stay byte-for-byte identical.
pub fn base_string(http_method: &str, url: &str, params: &Parameters<'_>) -> String {
    format!(
        "{}{}?{}",
        http_method.to_ascii_uppercase(),
        url,
        params.join("&")
    )
}

/// Signing key: `{consumer_secret}&{token_secret}`, unencoded.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", consumer_secret, token_secret)
}

/// Lowercase hex HMAC-SHA1 of `base_str`.
pub fn generate_signature_hmacsha1(
    consumer_secret: &str,
    token_secret: &str,
    base_str: &str,
) -> String {
    let sign_key = signing_key(consumer_secret, token_secret);
    // NOTE: HMAC takes keys of any length, so this never fails.
    let mut mac =
        HmacSha1::new_from_slice(sign_key.as_bytes()).expect("HMAC can take any size of key");
    mac.update(base_str.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// `OAuth k=v,k=v,...` header value.
pub fn authorization_header(params: &Parameters<'_>) -> String {
    format!("{} {}", OAUTH_HEADER, params.join(","))
}
