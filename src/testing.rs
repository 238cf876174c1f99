//! Scripted transport for unit tests.

use crate::error::Result;
use crate::transport::{Request, Response, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub(crate) const BASE: &str = "http://test";

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub(crate) request: Request,
    /// Virtual time since the fake was created.
    pub(crate) at: Duration,
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    replies: HashMap<(Method, String), Response>,
    delays: HashMap<String, Duration>,
}

/// Answers from a table keyed by method and URL; unknown routes get 404.
/// Every request is recorded with its dispatch time before any delay.
#[derive(Clone)]
pub(crate) struct FakeTransport {
    script: Arc<Mutex<Script>>,
    started: Instant,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            script: Arc::default(),
            started: Instant::now(),
        }
    }

    pub(crate) fn reply(&self, method: Method, url: impl Into<String>, response: Response) {
        self.script
            .lock()
            .replies
            .insert((method, url.into()), response);
    }

    pub(crate) fn reply_json(&self, method: Method, url: impl Into<String>, body: Value) {
        self.reply(method, url, Response::json(StatusCode::OK, body));
    }

    pub(crate) fn fail(&self, method: Method, url: impl Into<String>) {
        self.reply(method, url, Response::empty(StatusCode::INTERNAL_SERVER_ERROR));
    }

    pub(crate) fn delay(&self, url: impl Into<String>, delay: Duration) {
        self.script.lock().delays.insert(url.into(), delay);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.request.url).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let (delay, response) = {
            let mut script = self.script.lock();
            let delay = script.delays.get(&request.url).copied();
            let response = script
                .replies
                .get(&(request.method.clone(), request.url.clone()))
                .cloned()
                .unwrap_or_else(|| Response::empty(StatusCode::NOT_FOUND));
            script.calls.push(Call {
                request,
                at: self.started.elapsed(),
            });
            (delay, response)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(response)
    }
}
