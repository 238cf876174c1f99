use crate::service::HeroService;
use crate::types::{Hero, HeroList};

/// Heroes shown on the dashboard: list positions 1 through 4.
const TOP: std::ops::Range<usize> = 1..5;

#[derive(Debug)]
pub struct Dashboard {
    service: HeroService,
    heroes: HeroList,
}

impl Dashboard {
    pub fn new(service: HeroService) -> Self {
        Self {
            service,
            heroes: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        let heroes = self.service.list().await;
        let end = TOP.end.min(heroes.len());
        let start = TOP.start.min(end);
        self.heroes = heroes[start..end].to_vec();
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }
}
