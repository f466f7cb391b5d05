pub mod session;

pub use crate::domain::calculator::calculate_quote;
pub use crate::domain::model::{Catalog, PricingConfig, QuoteResult};
pub use crate::domain::ports::{ConfigSource, SubmissionSink};
pub use crate::domain::selections::Selections;
pub use crate::utils::error::Result;
pub use session::{CheckoutStage, EstimatorSession, SubmitStatus};
