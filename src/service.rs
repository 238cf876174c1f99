//! Remote access to the hero catalog.
//!
//! Every operation here completes normally. Failures are reported through
//! `tracing` and the status log, then replaced by an empty or absent result
//! so callers keep running.

use crate::api::{api_hero, api_heroes, api_search};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::messages::MessageLog;
use crate::transport::{Request, Transport};
use crate::types::{Hero, HeroList, HeroRef, NewHero};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

const COMPONENT: &str = "HeroService";

#[derive(Clone)]
pub struct HeroService {
    transport: Arc<dyn Transport>,
    messages: MessageLog,
    base_url: String,
}

impl std::fmt::Debug for HeroService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HeroService {
    pub fn new(transport: impl Transport, messages: MessageLog, config: &ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            messages,
            base_url: config.base_url.clone(),
        }
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// GET all heroes. Empty on failure.
    pub async fn list(&self) -> HeroList {
        match self.fetch(Request::get(api_heroes(&self.base_url))).await {
            Ok(heroes) => {
                self.log("fetched heroes");
                heroes
            }
            Err(e) => self.handle_error("getHeroes", e, Vec::new()),
        }
    }

    /// GET one hero. `None` on any failure, not-found included.
    pub async fn get(&self, id: i32) -> Option<Hero> {
        self.try_get(id).await.ok()
    }

    /// Like `get`, but keeps the failure so not-found can be told apart from
    /// a broken backend. Writes the same status line as `get`.
    pub async fn try_get(&self, id: i32) -> Result<Hero> {
        let result = self.fetch(Request::get(api_hero(&self.base_url, id))).await;
        match &result {
            Ok(_) => self.log(format!("fetched hero id={id}")),
            Err(e) => self.report(&format!("getHero id={id}"), e),
        }
        result
    }

    /// GET heroes whose name contains `term`. A blank term never reaches the
    /// backend.
    pub async fn search(&self, term: &str) -> HeroList {
        if term.trim().is_empty() {
            return Vec::new();
        }
        match self
            .fetch(Request::get(api_search(&self.base_url, term)))
            .await
        {
            Ok(heroes) => {
                self.log(format!("found heroes matching \"{term}\""));
                heroes
            }
            Err(e) => self.handle_error("searchHeroes", e, Vec::new()),
        }
    }

    /// POST a new hero and return it with its server-assigned id.
    pub async fn add(&self, hero: &NewHero) -> Option<Hero> {
        match self.try_add(hero).await {
            Ok(created) => {
                self.log(format!("added hero w/ id={}", created.id));
                Some(created)
            }
            Err(e) => self.handle_error("addHero", e, None),
        }
    }

    /// DELETE by id. Returns the deleted record when the backend echoes it.
    pub async fn remove(&self, hero: impl Into<HeroRef>) -> Option<Hero> {
        let id = hero.into().id();
        match self.try_remove(id).await {
            Ok(deleted) => {
                self.log(format!("deleted hero id={id}"));
                deleted
            }
            Err(e) => self.handle_error("deleteHero", e, None),
        }
    }

    /// PUT the hero. `Some(())` once the backend accepted it.
    pub async fn update(&self, hero: &Hero) -> Option<()> {
        match self.try_update(hero).await {
            Ok(()) => {
                self.log(format!("updated hero id={}", hero.id));
                Some(())
            }
            Err(e) => self.handle_error("updateHero", e, None),
        }
    }

    async fn try_add(&self, hero: &NewHero) -> Result<Hero> {
        let body = serde_json::to_value(hero)?;
        self.fetch(Request::post(api_heroes(&self.base_url), body))
            .await
    }

    async fn try_remove(&self, id: i32) -> Result<Option<Hero>> {
        let body = self
            .exchange(Request::delete(api_hero(&self.base_url, id)))
            .await?;
        match body {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    async fn try_update(&self, hero: &Hero) -> Result<()> {
        let body = serde_json::to_value(hero)?;
        self.exchange(Request::put(api_heroes(&self.base_url), body))
            .await?;
        Ok(())
    }

    async fn exchange(&self, request: Request) -> Result<Option<Value>> {
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        match response.status {
            StatusCode::NOT_FOUND => Err(Error::NotFound { url }),
            status if !status.is_success() => Err(Error::Status { status, url }),
            _ => Ok(response.body),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let body = self.exchange(request).await?.unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }

    fn handle_error<T>(&self, operation: &str, e: Error, result: T) -> T {
        self.report(operation, &e);
        result
    }

    fn report(&self, operation: &str, e: &Error) {
        error!(operation, error = %e, "hero request failed");
        self.log(format!("{operation} failed: {e}"));
    }

    fn log(&self, message: impl AsRef<str>) {
        self.messages
            .add(format!("{COMPONENT}: {}", message.as_ref()));
    }
}
