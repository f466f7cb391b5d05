pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::MockBackend;
pub use config::catalog::default_catalog;
pub use config::EstimatorConfig;
pub use crate::core::{calculate_quote, EstimatorSession};
pub use domain::model::{Catalog, PricingConfig, QuoteFormData, QuoteResult, Tier};
pub use domain::selections::Selections;
pub use utils::error::{EstimatorError, Result};
