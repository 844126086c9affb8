use hmac::{Hmac, Mac};
use proptest::prelude::*;
use sha1::Sha1;

use nuorder::parameters::parse_pairs;
use nuorder::v1::{OAuthSignBuilder, Secrets};

fn hmac_sha1_hex(key: &str, text: &str) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).unwrap();
    mac.update(text.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn signature_matches_independent_hmac(
        consumer_key in "[A-Za-z0-9]{1,32}",
        token in "[A-Za-z0-9]{0,32}",
        consumer_secret in "[A-Za-z0-9]{1,48}",
        token_secret in "[A-Za-z0-9]{0,48}",
        method in "GET|POST|PUT|DELETE",
        path in "/api(/[a-z0-9]{1,12}){1,4}",
        timestamp in 1_000_000_000i64..4_000_000_000i64,
        extra in proptest::option::of("[a-z0-9]{1,16}"),
    ) {
        let url = format!("https://wholesale.sandbox1.nuorder.com{}", path);
        let mut builder = OAuthSignBuilder::new(consumer_key.as_str(), token.as_str());
        builder.oauth_timestamp(timestamp);
        if let Some(verifier) = &extra {
            builder
                .add_base_string_param("oauth_verifier", verifier.as_str())
                .add_header_param("oauth_verifier", verifier.as_str());
        }
        let signed = builder.sign(&method, &url, &Secrets::new(consumer_secret.as_str(), token_secret.as_str()));

        let mut expected_base = format!(
            "{}{}?oauth_consumer_key={}&oauth_token={}&oauth_timestamp={}&oauth_nonce={}\
             &oauth_version=1.0&oauth_signature_method=HMAC-SHA1",
            method, url, consumer_key, token, timestamp, signed.nonce,
        );
        if let Some(verifier) = &extra {
            expected_base.push_str(&format!("&oauth_verifier={}", verifier));
        }
        prop_assert_eq!(&signed.base_string, &expected_base);
        prop_assert_eq!(
            &signed.signature,
            &hmac_sha1_hex(&format!("{}&{}", consumer_secret, token_secret), &expected_base)
        );

        let header = signed.authorization.strip_prefix("OAuth ").unwrap();
        let params = parse_pairs(header, ',');
        prop_assert_eq!(params.get("oauth_signature"), Some(signed.signature.as_str()));
        prop_assert_eq!(params.get("oauth_verifier"), extra.as_deref());
    }

    #[test]
    fn nonce_is_sixteen_hex_chars(_round in 0u8..8) {
        let signed = OAuthSignBuilder::new("ck", "tok")
            .sign("GET", "https://h.example/api/x", &Secrets::new("cs", "ts"));
        prop_assert_eq!(signed.nonce.len(), 16);
        prop_assert!(signed.nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
