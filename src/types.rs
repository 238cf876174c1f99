use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub id: i32,
    pub name: String,
}
pub type HeroList = Vec<Hero>;

/// Body of a create request. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHero {
    pub name: String,
}

impl NewHero {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Anything a delete can be addressed by: a bare id or a full record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroRef(pub i32);

impl HeroRef {
    pub fn id(self) -> i32 {
        self.0
    }
}

impl From<i32> for HeroRef {
    fn from(id: i32) -> Self {
        HeroRef(id)
    }
}

impl From<&Hero> for HeroRef {
    fn from(hero: &Hero) -> Self {
        HeroRef(hero.id)
    }
}

impl From<Hero> for HeroRef {
    fn from(hero: Hero) -> Self {
        HeroRef(hero.id)
    }
}
