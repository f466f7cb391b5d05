use crate::domain::model::{QuoteFormData, QuoteResult, RemotePricing, SubmissionReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where live pricing values come from.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch_pricing(&self) -> Result<RemotePricing>;
}

/// Accepts a finished quote. Fails only with `SubmissionUnavailable`.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, form: &QuoteFormData, quote: &QuoteResult) -> Result<SubmissionReceipt>;
}

/// Decides whether a simulated submission attempt fails.
pub trait FailurePolicy: Send + Sync {
    fn should_fail(&self) -> bool;
}

pub trait SubmissionIdGenerator: Send + Sync {
    fn next_id(&self) -> u32;
}
