//! In-process stand-in for the heroes REST backend.

use crate::error::Result;
use crate::transport::{Request, Response, Transport};
use crate::types::{Hero, NewHero};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const SEED: &[(i32, &str)] = &[
    (11, "Dr Nice"),
    (12, "Narco"),
    (13, "Bombasto"),
    (14, "Celeritas"),
    (15, "Magneta"),
    (16, "RubberMan"),
    (17, "Dynama"),
    (18, "Dr IQ"),
    (19, "Magma"),
    (20, "Tornado"),
];

/// First id handed out by an empty table.
const FIRST_ID: i32 = 11;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    heroes: Arc<Mutex<Vec<Hero>>>,
}

impl InMemoryBackend {
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Arc::new(Mutex::new(heroes)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(
            SEED.iter()
                .map(|&(id, name)| Hero { id, name: name.to_string() })
                .collect(),
        )
    }

    pub fn heroes(&self) -> Vec<Hero> {
        self.heroes.lock().clone()
    }

    fn route(&self, request: Request) -> Response {
        let Ok(url) = Url::parse(&request.url) else {
            return Response::empty(StatusCode::BAD_REQUEST);
        };
        let Some(rest) = url.path().split_once("api/heroes").map(|(_, rest)| rest) else {
            return Response::empty(StatusCode::NOT_FOUND);
        };
        let rest = rest.trim_matches('/');

        if rest.is_empty() {
            let name = url
                .query_pairs()
                .find(|(k, _)| k == "name")
                .map(|(_, v)| v.into_owned());
            return match request.method {
                Method::GET => self.list(name.as_deref()),
                Method::POST => self.create(request.body),
                Method::PUT => self.replace(request.body),
                _ => Response::empty(StatusCode::METHOD_NOT_ALLOWED),
            };
        }

        let Ok(id) = rest.parse::<i32>() else {
            return Response::empty(StatusCode::NOT_FOUND);
        };
        match request.method {
            Method::GET => self.find(id),
            Method::DELETE => self.delete(id),
            _ => Response::empty(StatusCode::METHOD_NOT_ALLOWED),
        }
    }

    fn list(&self, name: Option<&str>) -> Response {
        let heroes = self.heroes.lock();
        let found: Vec<&Hero> = match name {
            Some(name) => {
                let name = name.to_lowercase();
                heroes
                    .iter()
                    .filter(|h| h.name.to_lowercase().contains(&name))
                    .collect()
            }
            None => heroes.iter().collect(),
        };
        json(StatusCode::OK, &found)
    }

    fn find(&self, id: i32) -> Response {
        match self.heroes.lock().iter().find(|h| h.id == id) {
            Some(hero) => json(StatusCode::OK, hero),
            None => Response::empty(StatusCode::NOT_FOUND),
        }
    }

    fn create(&self, body: Option<Value>) -> Response {
        let Some(new) = body.and_then(|b| serde_json::from_value::<NewHero>(b).ok()) else {
            return Response::empty(StatusCode::BAD_REQUEST);
        };
        let mut heroes = self.heroes.lock();
        let id = match heroes.iter().map(|h| h.id).max() {
            Some(max) => match max.checked_add(1) {
                Some(id) => id,
                None => return Response::empty(StatusCode::INSUFFICIENT_STORAGE),
            },
            None => FIRST_ID,
        };
        let hero = Hero { id, name: new.name };
        heroes.push(hero.clone());
        json(StatusCode::CREATED, &hero)
    }

    fn replace(&self, body: Option<Value>) -> Response {
        let Some(hero) = body.and_then(|b| serde_json::from_value::<Hero>(b).ok()) else {
            return Response::empty(StatusCode::BAD_REQUEST);
        };
        match self.heroes.lock().iter_mut().find(|h| h.id == hero.id) {
            Some(slot) => {
                *slot = hero;
                Response::empty(StatusCode::NO_CONTENT)
            }
            None => Response::empty(StatusCode::NOT_FOUND),
        }
    }

    fn delete(&self, id: i32) -> Response {
        let mut heroes = self.heroes.lock();
        match heroes.iter().position(|h| h.id == id) {
            Some(index) => {
                heroes.remove(index);
                Response::empty(StatusCode::NO_CONTENT)
            }
            None => Response::empty(StatusCode::NOT_FOUND),
        }
    }
}

fn json<T: serde::Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(body) => Response::json(status, body),
        Err(_) => Response::empty(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[async_trait]
impl Transport for InMemoryBackend {
    async fn send(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method, url = %request.url, "in-memory request");
        Ok(self.route(request))
    }
}
