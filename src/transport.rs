//! HTTP seam between `HeroService` and the backend.

use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(url: String) -> Self {
        Self { method: Method::GET, url, body: None }
    }

    pub fn post(url: String, body: Value) -> Self {
        Self { method: Method::POST, url, body: Some(body) }
    }

    pub fn put(url: String, body: Value) -> Self {
        Self { method: Method::PUT, url, body: Some(body) }
    }

    pub fn delete(url: String) -> Self {
        Self { method: Method::DELETE, url, body: None }
    }
}

/// A decoded response. `body` is `None` when the backend sent nothing, or
/// when the status was not a success (error pages are not parsed).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Response {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self { status, body: Some(body) }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// `Transport` over a real HTTP connection.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, JSON);
        // Every mutating request declares the content type, body or not.
        if request.method != Method::GET {
            builder = builder.header(CONTENT_TYPE, JSON);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() || bytes.is_empty() {
            return Ok(Response::empty(status));
        }
        Ok(Response::json(status, serde_json::from_slice(&bytes)?))
    }
}
