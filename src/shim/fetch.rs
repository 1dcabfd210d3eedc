//! Request and response types for the offline shim, plus the network seam.
//!
//! The shim intercepts one request at a time through an explicit
//! `handle_request` call, so requests and responses are plain values here
//! rather than browser events. `Network` is the trait boundary to the real
//! network; production uses `HttpNetwork` over reqwest, tests substitute
//! in-memory stubs.

// Allow dead code: request constructors cover all destinations
#![allow(dead_code)]

use futures::future::BoxFuture;
use reqwest::{header, Client, Method, StatusCode, Url};
use thiserror::Error;

/// HTTP request timeout in seconds.
/// Timeouts are the network stack's responsibility, not the shim's; this is
/// the only one in play.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Network unreachable: {0}")]
    Unreachable(String),
}

/// What kind of resource a request is for. Only `Document` changes shim
/// behavior (it gets the offline fallback); the rest are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Manifest,
    Other,
}

/// One intercepted resource request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
}

impl Request {
    pub fn new(method: Method, url: Url, destination: Destination) -> Self {
        Self {
            method,
            url,
            destination,
        }
    }

    /// A GET request for a non-document resource.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Other)
    }

    /// A GET request for a top-level document.
    pub fn document(url: Url) -> Self {
        Self::new(Method::GET, url, Destination::Document)
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}

/// A fetched or cached resource response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// The seam to the real network.
///
/// Futures are boxed and `'static` so background revalidation can be
/// spawned onto the runtime without borrowing the shim.
pub trait Network: Send + Sync + 'static {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, FetchError>>;
}

/// Production network implementation over reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, FetchError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let response = client
                .request(request.method, request.url)
                .send()
                .await?;

            let status = response.status();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let body = response.bytes().await?.to_vec();

            Ok(Response {
                status,
                content_type,
                body,
            })
        })
    }
}
