use crate::service::HeroService;
use crate::types::{Hero, HeroList, NewHero};

/// The full hero list with add and delete.
#[derive(Debug)]
pub struct HeroesView {
    service: HeroService,
    heroes: HeroList,
}

impl HeroesView {
    pub fn new(service: HeroService) -> Self {
        Self {
            service,
            heroes: Vec::new(),
        }
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    pub async fn load(&mut self) {
        self.heroes = self.service.list().await;
    }

    /// Blank names are ignored without a request.
    pub async fn add(&mut self, name: &str) -> Option<&Hero> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let created = self.service.add(&NewHero::new(name)).await?;
        self.heroes.push(created);
        self.heroes.last()
    }

    /// Drops the hero locally first; the list does not wait on the backend.
    pub async fn delete(&mut self, hero: &Hero) {
        self.heroes.retain(|h| h.id != hero.id);
        self.service.remove(hero).await;
    }
}
