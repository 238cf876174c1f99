use crate::error::{Error, Result};
use crate::service::HeroService;
use crate::types::Hero;
use tracing::debug;

/// Where "back" goes. Supplied by whatever owns navigation history.
pub trait Navigator {
    fn back(&self);
}

/// One hero, resolved from the route's `id` parameter, editable in place.
#[derive(Debug)]
pub struct HeroDetail<N> {
    service: HeroService,
    navigator: N,
    id: i32,
    hero: Option<Hero>,
}

impl<N: Navigator> HeroDetail<N> {
    /// Read the route parameter once. Nothing is fetched until `load`.
    pub fn open(service: HeroService, navigator: N, id_param: &str) -> Result<Self> {
        let id = id_param
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRouteParam(id_param.to_string()))?;
        Ok(Self {
            service,
            navigator,
            id,
            hero: None,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub async fn load(&mut self) {
        self.hero = self.service.get(self.id).await;
    }

    pub fn hero(&self) -> Option<&Hero> {
        self.hero.as_ref()
    }

    pub fn hero_mut(&mut self) -> Option<&mut Hero> {
        self.hero.as_mut()
    }

    /// Push the edited record, then navigate back whatever the outcome.
    pub async fn save(&mut self) {
        if let Some(hero) = &self.hero {
            if self.service.update(hero).await.is_none() {
                debug!(id = hero.id, "save failed, leaving view anyway");
            }
        }
        self.go_back();
    }

    pub fn go_back(&self) {
        self.navigator.back();
    }
}
