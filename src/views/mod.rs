//! View controllers: the state behind each screen, minus the rendering.

pub mod dashboard;
pub mod detail;
pub mod heroes;

pub use dashboard::Dashboard;
pub use detail::{HeroDetail, Navigator};
pub use heroes::HeroesView;
