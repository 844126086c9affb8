#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use nuorder::error::BoxError;
use nuorder::{Client, Credentials, HttpRequest, HttpResponse, Method, Transport};

pub const HOST: &str = "wholesale.sandbox1.nuorder.com";

pub fn credentials() -> Credentials {
    Credentials::new(HOST, "ck", "cs", "tok", "ts")
}

pub fn url(endpoint: &str) -> String {
    format!("https://{}{}", HOST, endpoint)
}

/// In-memory transport: records every request and answers from a route table.
///
/// Unrouted requests get `200 {}`. Clones share state, so one clone can go
/// into a [`Client`] while the test keeps the other.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    routes: Arc<Mutex<BTreeMap<(String, String), HttpResponse>>>,
    offline: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails as if the host could not be reached.
    pub fn offline() -> Self {
        RecordingTransport {
            offline: true,
            ..Self::default()
        }
    }

    pub fn route(&self, method: Method, endpoint: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().unwrap().insert(
            (method.as_str().to_string(), url(endpoint)),
            HttpResponse::new(status, body),
        );
        self
    }

    pub fn client(&self) -> Client {
        Client::with_transport(credentials(), self.clone())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// `(method, url)` of every request, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        if self.offline {
            return Err("connection refused".into());
        }
        let key = (request.method.as_str().to_string(), request.url.clone());
        self.requests.lock().unwrap().push(request);
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(200, "{}")))
    }
}
