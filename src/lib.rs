pub mod aggregator;
pub mod catalog;
pub mod category;
pub mod config;
pub mod engine;
pub mod overlay;
pub mod platform;
pub mod scorers;
pub mod verdict;

pub use catalog::{CatalogError, RuleCatalog};
pub use category::{CategoryScores, RiskCategory};
pub use config::CatalogConfig;
pub use engine::{analyze, RiskEngine};
pub use platform::Platform;
pub use verdict::{RiskLevel, Verdict};
