//! Client for a REST hero catalog: list, search, view, edit and delete
//! heroes, with a typeahead search pipeline and a shared status log.

pub mod api;
pub mod config;
pub mod error;
pub mod memory;
pub mod messages;
pub mod search;
pub mod service;
pub mod transport;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use memory::InMemoryBackend;
pub use messages::MessageLog;
pub use search::{SearchHandle, SearchResults};
pub use service::HeroService;
pub use transport::{HttpTransport, Request, Response, Transport};
pub use types::{Hero, HeroList, HeroRef, NewHero};
