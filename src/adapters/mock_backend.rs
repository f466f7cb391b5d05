use crate::config::toml_config::EstimatorConfig;
use crate::domain::model::{QuoteFormData, QuoteResult, RemotePricing, SubmissionReceipt};
use crate::domain::ports::{ConfigSource, FailurePolicy, SubmissionIdGenerator, SubmissionSink};
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::validate_range;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub const UNAVAILABLE_MESSAGE: &str = "Quote service temporarily unavailable. Please try again.";

/// Fails each attempt independently with the given probability.
#[derive(Debug, Clone, Copy)]
pub struct RandomFailure {
    probability: f64,
}

impl RandomFailure {
    pub const DEFAULT_PROBABILITY: f64 = 0.1;

    /// Rejects NaN and anything outside `0.0..=1.0`.
    pub fn new(probability: f64) -> Result<Self> {
        validate_range("backend.failure_probability", probability, 0.0, 1.0)?;
        Ok(Self { probability })
    }
}

impl Default for RandomFailure {
    fn default() -> Self {
        Self {
            probability: Self::DEFAULT_PROBABILITY,
        }
    }
}

impl FailurePolicy for RandomFailure {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FailurePolicy for NeverFail {
    fn should_fail(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl FailurePolicy for AlwaysFail {
    fn should_fail(&self) -> bool {
        true
    }
}

/// Four-digit ids, like the post ids a CMS would hand back.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl SubmissionIdGenerator for RandomIdGenerator {
    fn next_id(&self) -> u32 {
        rand::thread_rng().gen_range(1000..=9999)
    }
}

#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU32,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl SubmissionIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// In-process stand-in for the CMS: delayed config fetch and quote submission.
pub struct MockBackend {
    pricing: RemotePricing,
    config_delay: Duration,
    submit_delay: Duration,
    failure: Box<dyn FailurePolicy>,
    ids: Box<dyn SubmissionIdGenerator>,
}

pub const DEFAULT_CONFIG_DELAY: Duration = Duration::from_millis(600);
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1200);

impl MockBackend {
    /// Realistic latency and a 10% chance of an unavailable backend.
    pub fn new(pricing: RemotePricing) -> Self {
        Self {
            pricing,
            config_delay: DEFAULT_CONFIG_DELAY,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            failure: Box::new(RandomFailure::default()),
            ids: Box::new(RandomIdGenerator),
        }
    }

    /// No delay and no failures, for deterministic runs.
    pub fn instant(pricing: RemotePricing) -> Self {
        Self::new(pricing)
            .with_delays(Duration::ZERO, Duration::ZERO)
            .with_failure_policy(NeverFail)
    }

    pub fn from_config(config: &EstimatorConfig) -> Result<Self> {
        let failure = RandomFailure::new(config.backend.failure_probability)?;
        Ok(Self::new(config.remote_pricing())
            .with_delays(config.backend.config_delay(), config.backend.submit_delay())
            .with_failure_policy(failure))
    }

    pub fn with_delays(mut self, config_delay: Duration, submit_delay: Duration) -> Self {
        self.config_delay = config_delay;
        self.submit_delay = submit_delay;
        self
    }

    pub fn with_failure_policy(mut self, policy: impl FailurePolicy + 'static) -> Self {
        self.failure = Box::new(policy);
        self
    }

    pub fn with_id_generator(mut self, ids: impl SubmissionIdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }
}

#[async_trait]
impl ConfigSource for MockBackend {
    async fn fetch_pricing(&self) -> Result<RemotePricing> {
        tracing::debug!(delay_ms = self.config_delay.as_millis() as u64, "fetching pricing config");
        tokio::time::sleep(self.config_delay).await;
        Ok(self.pricing.clone())
    }
}

#[async_trait]
impl SubmissionSink for MockBackend {
    async fn submit(&self, form: &QuoteFormData, quote: &QuoteResult) -> Result<SubmissionReceipt> {
        tracing::debug!(
            email = %form.email,
            total_price = quote.total_price,
            "submitting quote"
        );
        tokio::time::sleep(self.submit_delay).await;

        if self.failure.should_fail() {
            tracing::warn!("simulated submission failure");
            return Err(EstimatorError::SubmissionUnavailable {
                message: UNAVAILABLE_MESSAGE.to_string(),
            });
        }

        Ok(SubmissionReceipt {
            success: true,
            message: format!(
                "Quote submitted successfully! We'll contact {} within 24 hours.",
                form.email
            ),
            submission_id: self.ids.next_id(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Tier;

    fn empty_quote() -> QuoteResult {
        QuoteResult {
            total_price: 0,
            min_price: 0,
            max_price: 0,
            total_weeks: 1,
            selected_services: vec![],
            tier: Tier::Starter,
            gross_price: 0.0,
            discount: 0.0,
        }
    }

    fn form() -> QuoteFormData {
        QuoteFormData {
            name: "Anna".to_string(),
            email: "anna@example.ch".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_random_strategies_stay_in_bounds() {
        let ids = RandomIdGenerator;
        for _ in 0..200 {
            let id = ids.next_id();
            assert!((1000..=9999).contains(&id));
        }

        assert!(!RandomFailure::new(0.0).unwrap().should_fail());
        assert!(RandomFailure::new(1.0).unwrap().should_fail());
    }

    #[test]
    fn test_random_failure_rejects_invalid_probabilities() {
        for p in [f64::NAN, 7.0, -0.5, f64::INFINITY] {
            assert!(matches!(
                RandomFailure::new(p),
                Err(EstimatorError::InvalidConfigValueError { .. })
            ));
        }
    }

    #[test]
    fn test_from_config_rejects_nan_probability() {
        let mut config = EstimatorConfig::default();
        config.backend.failure_probability = f64::NAN;
        assert!(MockBackend::from_config(&config).is_err());
    }

    #[test]
    fn test_new_uses_simulated_latency_and_failure_rate() {
        let backend = MockBackend::new(RemotePricing::default());
        assert_eq!(backend.config_delay, Duration::from_millis(600));
        assert_eq!(backend.submit_delay, Duration::from_millis(1200));
        assert_eq!(
            RandomFailure::default().probability,
            RandomFailure::DEFAULT_PROBABILITY
        );

        let instant = MockBackend::instant(RemotePricing::default());
        assert_eq!(instant.config_delay, Duration::ZERO);
        assert!(!instant.failure.should_fail());
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::starting_at(4000);
        assert_eq!(ids.next_id(), 4000);
        assert_eq!(ids.next_id(), 4001);
    }

    #[test]
    fn test_forced_outcomes() {
        let ok = MockBackend::instant(RemotePricing::default())
            .with_id_generator(SequentialIdGenerator::starting_at(1234));
        let receipt = tokio_test::block_on(ok.submit(&form(), &empty_quote())).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.submission_id, 1234);
        assert!(receipt.message.contains("anna@example.ch"));

        let down = MockBackend::instant(RemotePricing::default()).with_failure_policy(AlwaysFail);
        let err = tokio_test::block_on(down.submit(&form(), &empty_quote())).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_returns_configured_pricing() {
        let pricing = RemotePricing {
            currency: "EUR".to_string(),
            discount_threshold: 1000.0,
            discount_percentage: 5.0,
        };
        let backend = MockBackend::instant(pricing.clone())
            .with_delays(Duration::from_millis(5), Duration::ZERO);
        assert_eq!(backend.fetch_pricing().await.unwrap(), pricing);
    }
}
