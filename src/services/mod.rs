pub mod account;
pub mod catalog;
pub mod gatherings;
pub mod load;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod survey;

pub use catalog::CatalogBrowser;
pub use gatherings::GatheringBrowser;
pub use load::Load;
pub use providers::{HobbyCatalog, Providers, RecommendationEngine, SurveyStore};
pub use recommendations::{Badge, RecommendationView};
pub use survey::{FlowState, SurveyFlow};
