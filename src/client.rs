//! OAuth signed client for the NuOrder API.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::util;
use crate::v1::values::*;
use crate::v1::{OAuthSignBuilder, Secrets};

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CONTENT_ENCODING: &str = "Content-Encoding";
const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_ENCODING_GZIP: &str = "gzip";

const ENDPOINT_INITIATE: &str = "/api/initiate";
const ENDPOINT_TOKEN: &str = "/api/token";

/// Stands in for the body in a dry-run description.
pub const DRY_RUN_BODY_PLACEHOLDER: &str = "[as passed in]";

/// Hostname plus the four OAuth credential strings.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub hostname: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

impl Credentials {
    pub fn new(
        hostname: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        oauth_token: impl Into<String>,
        oauth_token_secret: impl Into<String>,
    ) -> Self {
        Credentials {
            hostname: hostname.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            oauth_token: oauth_token.into(),
            oauth_token_secret: oauth_token_secret.into(),
        }
    }

    /// Same consumer, different token pair. Used between handshake steps.
    pub fn with_token(&self, token: &TokenPair) -> Self {
        Credentials {
            oauth_token: token.oauth_token.clone(),
            oauth_token_secret: token.oauth_token_secret.clone(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("hostname", &self.hostname)
            .field("consumer_key", &self.consumer_key)
            .field("oauth_token", &self.oauth_token)
            .finish_non_exhaustive()
    }
}

/// Request body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Sent exactly as given.
    Text(String),
    /// Serialized with 2-space indentation.
    Json(Value),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }

    /// Raw bytes are taken as UTF-8 text.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map(Payload::Text)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn to_text(&self) -> Result<String> {
        match self {
            Payload::Text(text) => Ok(text.clone()),
            Payload::Json(value) => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Payload::Json(v)
    }
}

/// One call to the API: method, endpoint and how to send it.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Payload>,
    pub gzip_body: bool,
    pub dry_run: bool,
    pub base_string_params: Vec<(String, String)>,
    pub header_params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        RequestDescriptor {
            method,
            endpoint: endpoint.into(),
            body: None,
            gzip_body: false,
            dry_run: false,
            base_string_params: Vec::new(),
            header_params: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    /// First leg of the handshake: `GET /api/initiate`.
    ///
    /// `oauth_callback=oob` is signed and sent; `application_name` is sent only.
    pub fn initiate(app_name: impl Into<String>) -> Self {
        Self::get(ENDPOINT_INITIATE)
            .base_string_param(OAUTH_PARAM_KEY_CALLBACK, OAUTH_VALUE_CALLBACK_OOB)
            .header_param(PARAM_KEY_APPLICATION_NAME, app_name)
            .header_param(OAUTH_PARAM_KEY_CALLBACK, OAUTH_VALUE_CALLBACK_OOB)
    }

    /// Second leg: `GET /api/token`, signing and sending `oauth_verifier`.
    pub fn token_request(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        Self::get(ENDPOINT_TOKEN)
            .base_string_param(OAUTH_PARAM_KEY_VERIFIER, verifier.clone())
            .header_param(OAUTH_PARAM_KEY_VERIFIER, verifier)
    }

    pub fn body(mut self, body: impl Into<Payload>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn maybe_body(mut self, body: Option<Payload>) -> Self {
        self.body = body;
        self
    }

    pub fn gzip_body(mut self, gzip: bool) -> Self {
        self.gzip_body = gzip;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn base_string_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_string_params.push((key.into(), value.into()));
        self
    }

    pub fn header_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_params.push((key.into(), value.into()));
        self
    }
}

/// What a dry run would have sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WouldDo {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub data: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Json(Value),
    DryRun(WouldDo),
}

impl Reply {
    /// Dry runs render as `{"would_do": {...}}`.
    pub fn into_json(self) -> Value {
        match self {
            Reply::Json(value) => value,
            Reply::DryRun(would_do) => serde_json::json!({ "would_do": would_do }),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Reply::DryRun(_))
    }
}

/// Token pair returned by both handshake legs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

/// Diagnostic returned in place of a body that is not JSON.
#[derive(Clone, Debug, Serialize)]
struct UndecodableBody<'a> {
    response_status_code: u16,
    response_text: &'a str,
    error: String,
}

/// Signs and sends requests to one NuOrder host.
///
/// Holds only immutable credentials and a transport; every call generates
/// its own timestamp and nonce.
pub struct Client {
    credentials: Credentials,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Client backed by a blocking `reqwest` transport.
    #[cfg(feature = "reqwest")]
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(
            credentials,
            crate::transport::ReqwestTransport::new()?,
        ))
    }

    pub fn with_transport(credentials: Credentials, transport: impl Transport + 'static) -> Self {
        Client {
            credentials,
            transport: Box::new(transport),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign and send (or, for a dry run, only describe) one request.
    ///
    /// A status >= 400 is [`Error::HttpStatus`]. A successful body that is
    /// not JSON is returned as a diagnostic object instead of an error.
    pub fn signed_request(&self, request: RequestDescriptor) -> Result<Reply> {
        let dry_run = request.dry_run;
        let prepared = self.prepare(&request)?;
        if dry_run {
            return Ok(Reply::DryRun(WouldDo {
                method: prepared.method,
                url: prepared.url,
                headers: prepared.headers.into_iter().collect(),
                data: request.body.as_ref().map(|_| DRY_RUN_BODY_PLACEHOLDER),
            }));
        }
        let response = self.execute(prepared)?;
        Ok(Reply::Json(decode_body(&response)))
    }

    pub fn get(&self, endpoint: &str) -> Result<Value> {
        self.signed_request(RequestDescriptor::get(endpoint))
            .map(Reply::into_json)
    }

    pub fn delete(&self, endpoint: &str) -> Result<Value> {
        self.signed_request(RequestDescriptor::delete(endpoint))
            .map(Reply::into_json)
    }

    pub fn post(&self, endpoint: &str, body: Option<Payload>, gzip_body: bool) -> Result<Value> {
        self.signed_request(
            RequestDescriptor::post(endpoint)
                .maybe_body(body)
                .gzip_body(gzip_body),
        )
        .map(Reply::into_json)
    }

    pub fn put(&self, endpoint: &str, body: Option<Payload>, gzip_body: bool) -> Result<Value> {
        self.signed_request(
            RequestDescriptor::put(endpoint)
                .maybe_body(body)
                .gzip_body(gzip_body),
        )
        .map(Reply::into_json)
    }

    /// GET and decode into `T`. A body of the wrong shape is
    /// [`Error::ResponseDecode`].
    pub fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.typed(RequestDescriptor::get(endpoint))
    }

    pub fn put_as<B, T>(&self, endpoint: &str, body: &B, gzip_body: bool) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.typed(
            RequestDescriptor::put(endpoint)
                .body(Payload::json(body)?)
                .gzip_body(gzip_body),
        )
    }

    pub fn post_as<B, T>(&self, endpoint: &str, body: &B, gzip_body: bool) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.typed(
            RequestDescriptor::post(endpoint)
                .body(Payload::json(body)?)
                .gzip_body(gzip_body),
        )
    }

    /// Request a temporary token pair for `app_name`.
    pub fn oauth_initiate(&self, app_name: &str) -> Result<TokenPair> {
        self.handshake(RequestDescriptor::initiate(app_name))
    }

    /// Exchange the verifier shown in the NuOrder admin for the final pair.
    pub fn oauth_token_request(&self, verifier: &str) -> Result<TokenPair> {
        self.handshake(RequestDescriptor::token_request(verifier))
    }

    fn handshake(&self, request: RequestDescriptor) -> Result<TokenPair> {
        let response = self.execute(self.prepare(&request)?)?;
        let value = decode_body(&response);
        if value.get("request_error").is_some() {
            return Err(Error::Handshake(util::pretty_body(&response.body)));
        }
        serde_json::from_value(value).map_err(|_| Error::ResponseDecode {
            status: response.status,
            text: response.body,
        })
    }

    fn typed<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        let response = self.execute(self.prepare(&request)?)?;
        serde_json::from_str(&response.body).map_err(|_| Error::ResponseDecode {
            status: response.status,
            text: response.body,
        })
    }

    /// Build the signed wire request for `request`.
    fn prepare(&self, request: &RequestDescriptor) -> Result<HttpRequest> {
        let creds = &self.credentials;
        let method = request.method;
        let url = util::target_url(&creds.hostname, &request.endpoint)?;

        let mut builder = OAuthSignBuilder::new(creds.consumer_key.as_str(), creds.oauth_token.as_str());
        for (k, v) in &request.base_string_params {
            builder.add_base_string_param(k.as_str(), v.as_str());
        }
        for (k, v) in &request.header_params {
            builder.add_header_param(k.as_str(), v.as_str());
        }
        let signed = builder.sign(
            method.as_str(),
            &url,
            &Secrets::new(creds.consumer_secret.as_str(), creds.oauth_token_secret.as_str()),
        );

        let mut headers = vec![
            (HEADER_AUTHORIZATION.to_string(), signed.authorization),
            (HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string()),
        ];
        if request.gzip_body {
            headers.push((
                HEADER_CONTENT_ENCODING.to_string(),
                CONTENT_ENCODING_GZIP.to_string(),
            ));
        }
        debug!(?headers, "request headers");

        let body = match &request.body {
            Some(payload) => {
                let text = payload.to_text()?;
                if request.gzip_body {
                    Some(gzip(text.as_bytes())?)
                } else {
                    Some(text.into_bytes())
                }
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send and turn error statuses into [`Error::HttpStatus`].
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        info!("{} {}", request.method, request.url);
        let response = self.transport.send(request).map_err(Error::Transport)?;
        if response.is_error() {
            return Err(Error::HttpStatus {
                status: response.status,
                body: util::pretty_body(&response.body),
            });
        }
        info!("Returned HTTP status {}", response.status);
        Ok(response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Parse a successful body. Never fails: an empty body is `{}`, anything
/// else that is not JSON becomes a diagnostic object.
fn decode_body(response: &HttpResponse) -> Value {
    match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) if response.body.is_empty() => Value::Object(serde_json::Map::new()),
        Err(e) => serde_json::to_value(UndecodableBody {
            response_status_code: response.status,
            response_text: &response.body,
            error: e.to_string(),
        })
        .unwrap_or(Value::Null),
    }
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
