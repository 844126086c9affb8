use std::borrow::Cow;

use crate::parameters::Parameters;
use crate::util;

mod signer;
pub mod values;

pub use signer::{authorization_header, base_string, generate_signature_hmacsha1, signing_key};
use values::*;

/// Consumer and token secrets; together they form the HMAC key.
#[derive(Clone)]
pub struct Secrets<'a> {
    consumer_secret: Cow<'a, str>,
    token_secret: Cow<'a, str>,
}

impl<'a> Secrets<'a> {
    pub fn new<TConsumerSecret, TTokenSecret>(
        consumer_secret: TConsumerSecret,
        token_secret: TTokenSecret,
    ) -> Self
    where
        TConsumerSecret: Into<Cow<'a, str>>,
        TTokenSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer_secret: consumer_secret.into(),
            token_secret: token_secret.into(),
        }
    }
}

impl std::fmt::Debug for Secrets<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets").finish_non_exhaustive()
    }
}

/// Output of [`OAuthSignBuilder::sign`].
#[derive(Clone, Debug)]
pub struct SignedContent {
    pub signature: String,
    pub nonce: String,
    pub timestamp: i64,
    pub base_string: String,
    /// Full `Authorization` header value.
    pub authorization: String,
}

/// OAuth Signature Builder
///
/// Produces the marketplace flavour of an OAuth 1.0 HMAC-SHA1 signature: the
/// six basic parameters in fixed order, then any extra signed parameters.
pub struct OAuthSignBuilder<'a> {
    oauth_consumer_key: Cow<'a, str>,
    oauth_token: Cow<'a, str>,
    oauth_nonce: Option<Cow<'a, str>>,
    oauth_timestamp: Option<i64>,
    base_string_params: Parameters<'a>,
    header_params: Parameters<'a>,
}

impl<'a> OAuthSignBuilder<'a> {
    pub fn new<K, T>(consumer_key: K, oauth_token: T) -> Self
    where
        K: Into<Cow<'a, str>>,
        T: Into<Cow<'a, str>>,
    {
        OAuthSignBuilder {
            oauth_consumer_key: consumer_key.into(),
            oauth_token: oauth_token.into(),
            oauth_nonce: None,
            oauth_timestamp: None,
            base_string_params: Parameters::new(),
            header_params: Parameters::new(),
        }
    }

    pub fn oauth_nonce(&mut self, nonce: impl Into<Cow<'a, str>>) -> &mut Self {
        self.oauth_nonce = Some(nonce.into());
        self
    }

    pub fn oauth_timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.oauth_timestamp = Some(timestamp);
        self
    }

    /// Parameter appended to the string to sign (and nowhere else).
    pub fn add_base_string_param(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
    ) -> &mut Self {
        self.base_string_params.push(key, value);
        self
    }

    /// Parameter appended to the header after `oauth_signature`.
    ///
    /// A parameter that must be both signed and sent is added with both
    /// [`add_base_string_param`](Self::add_base_string_param) and this.
    pub fn add_header_param(
        &mut self,
        key: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
    ) -> &mut Self {
        self.header_params.push(key, value);
        self
    }

    pub fn add_base_string_params(&mut self, params: &Parameters<'a>) -> &mut Self {
        self.base_string_params.extend(params.pairs().iter().cloned());
        self
    }

    pub fn add_header_params(&mut self, params: &Parameters<'a>) -> &mut Self {
        self.header_params.extend(params.pairs().iter().cloned());
        self
    }

    /// Sign a request to `url`. Nonce and timestamp default to fresh values.
    pub fn sign(&self, http_method: &str, url: &str, secrets: &Secrets<'_>) -> SignedContent {
        let timestamp = self.oauth_timestamp.unwrap_or_else(util::timestamp_now);
        let nonce = self
            .oauth_nonce
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(util::generate_nonce);
        let timestamp_str = timestamp.to_string();

        let mut signed = self.basic_params(&timestamp_str, &nonce);
        signed.extend(owned_pairs(&self.base_string_params));
        let base_str = base_string(http_method, url, &signed);
        let signature = generate_signature_hmacsha1(
            &secrets.consumer_secret,
            &secrets.token_secret,
            &base_str,
        );
        tracing::debug!("HMAC text: {}", base_str);
        tracing::debug!("HMAC hash: {}", signature);

        let mut header = self.basic_params(&timestamp_str, &nonce);
        header.push(OAUTH_PARAM_KEY_SIGNATURE, signature.clone());
        header.extend(owned_pairs(&self.header_params));
        let authorization = authorization_header(&header);

        SignedContent {
            signature,
            nonce,
            timestamp,
            base_string: base_str,
            authorization,
        }
    }

    fn basic_params(&self, timestamp: &str, nonce: &str) -> Parameters<'static> {
        let mut params = Parameters::new();
        params
            .push(OAUTH_PARAM_KEY_CONSUMER_KEY, self.oauth_consumer_key.to_string())
            .push(OAUTH_PARAM_KEY_TOKEN, self.oauth_token.to_string())
            .push(OAUTH_PARAM_KEY_TIMESTAMP, timestamp.to_string())
            .push(OAUTH_PARAM_KEY_NONCE, nonce.to_string())
            .push(OAUTH_PARAM_KEY_VERSION, OAUTH_VALUE_VERSION)
            .push(OAUTH_PARAM_KEY_SIGNATURE_METHOD, OAUTH_VALUE_SIGMETHOD_HMACSHA1);
        params
    }
}

fn owned_pairs(params: &Parameters<'_>) -> Vec<(String, String)> {
    params
        .pairs()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::parse_pairs;

    const URL: &str = "https://wholesale.sandbox1.nuorder.com/api/companies/codes/list";

    #[test]
    fn test_signing() {
        let sign = OAuthSignBuilder::new("ck", "tok")
            .oauth_nonce("0123456789abcdef")
            .oauth_timestamp(1_500_000_000)
            .sign("get", URL, &Secrets::new("cs", "ts"));
        assert_eq!(sign.signature, "8b3ded88935fc873ad53464d747bf545433ce83a");
        assert_eq!(
            sign.authorization,
            "OAuth oauth_consumer_key=ck,oauth_token=tok,oauth_timestamp=1500000000,\
             oauth_nonce=0123456789abcdef,oauth_version=1.0,oauth_signature_method=HMAC-SHA1,\
             oauth_signature=8b3ded88935fc873ad53464d747bf545433ce83a"
        );
    }

    #[test]
    fn test_initiate_params_split_between_base_and_header() {
        let sign = OAuthSignBuilder::new("ck", "")
            .oauth_nonce("0123456789abcdef")
            .oauth_timestamp(1_500_000_000)
            .add_base_string_param(OAUTH_PARAM_KEY_CALLBACK, OAUTH_VALUE_CALLBACK_OOB)
            .add_header_param(PARAM_KEY_APPLICATION_NAME, "My App")
            .add_header_param(OAUTH_PARAM_KEY_CALLBACK, OAUTH_VALUE_CALLBACK_OOB)
            .sign(
                "GET",
                "https://wholesale.sandbox1.nuorder.com/api/initiate",
                &Secrets::new("cs", ""),
            );
        assert_eq!(sign.signature, "08dbb39f7eeef88a59dcdc291d8d420071cc3c77");
        assert!(sign.base_string.ends_with("&oauth_callback=oob"));
        assert!(!sign.base_string.contains("application_name"));
        assert!(sign
            .authorization
            .ends_with(",oauth_signature=08dbb39f7eeef88a59dcdc291d8d420071cc3c77,application_name=My App,oauth_callback=oob"));
    }

    #[test]
    fn test_fresh_nonce_and_timestamp_by_default() {
        let builder = OAuthSignBuilder::new("ck", "tok");
        let secrets = Secrets::new("cs", "ts");
        let first = builder.sign("GET", URL, &secrets);
        let second = builder.sign("GET", URL, &secrets);
        assert_eq!(first.nonce.len(), 16);
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.signature, second.signature);
        assert!(first.timestamp > 1_500_000_000);
    }

    #[test]
    fn test_header_round_trips_to_signature() {
        let secrets = Secrets::new("cs", "ts");
        let sign = OAuthSignBuilder::new("ck", "tok").sign("PUT", URL, &secrets);
        let header = sign.authorization.trim_start_matches("OAuth ");
        let params = parse_pairs(header, ',');
        assert_eq!(params.get("oauth_signature"), Some(sign.signature.as_str()));
        assert_eq!(params.get("oauth_nonce"), Some(sign.nonce.as_str()));
        assert_eq!(
            params.get("oauth_timestamp"),
            Some(sign.timestamp.to_string().as_str())
        );
    }

    #[test]
    fn test_secrets_debug_is_redacted() {
        let secrets = Secrets::new("very-secret", "also-secret");
        let printed = format!("{:?}", secrets);
        assert!(!printed.contains("secret\""));
        assert!(!printed.contains("very-secret"));
    }
}
