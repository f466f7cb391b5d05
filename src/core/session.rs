use crate::domain::calculator::calculate_quote;
use crate::domain::model::{
    Catalog, PricingConfig, QuoteFormData, QuoteResult, ServiceCategory, SubmissionReceipt,
};
use crate::domain::ports::{ConfigSource, SubmissionSink};
use crate::domain::selections::Selections;
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::Validate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Configure,
    Review,
    Payment,
    Success,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Configure => "configure",
            CheckoutStage::Review => "review",
            CheckoutStage::Payment => "payment",
            CheckoutStage::Success => "success",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success { message: String, submission_id: u32 },
    Error { message: String },
}

/// One interactive run of the estimator.
pub struct EstimatorSession<C: ConfigSource, S: SubmissionSink> {
    catalog: Catalog,
    pricing: PricingConfig,
    config_source: C,
    sink: S,
    selections: Selections,
    config_loading: bool,
    current_step: usize,
    stage: CheckoutStage,
    submit_status: SubmitStatus,
}

impl<C: ConfigSource, S: SubmissionSink> EstimatorSession<C, S> {
    pub fn new(catalog: Catalog, pricing: PricingConfig, config_source: C, sink: S) -> Self {
        Self {
            catalog,
            pricing,
            config_source,
            sink,
            selections: Selections::new(),
            config_loading: true,
            current_step: 0,
            stage: CheckoutStage::Configure,
            submit_status: SubmitStatus::Idle,
        }
    }

    /// Pulls live pricing from the config source. On failure the local values stay.
    pub async fn load_config(&mut self) {
        match self.config_source.fetch_pricing().await {
            Ok(remote) => {
                tracing::info!(
                    currency = %remote.currency,
                    discount_threshold = remote.discount_threshold,
                    discount_percentage = remote.discount_percentage,
                    "pricing config loaded"
                );
                self.pricing.apply_remote(&remote);
            }
            Err(e) => {
                tracing::warn!("Failed to load pricing config, keeping local values: {}", e);
            }
        }
        self.config_loading = false;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn config_loading(&self) -> bool {
        self.config_loading
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn toggle(&mut self, category_id: &str, option_id: &str) -> Result<()> {
        let category = self.catalog.category(category_id).ok_or_else(|| {
            EstimatorError::UnknownCategory {
                category_id: category_id.to_string(),
            }
        })?;
        if category.option(option_id).is_none() {
            return Err(EstimatorError::UnknownOption {
                category_id: category_id.to_string(),
                option_id: option_id.to_string(),
            });
        }

        self.selections = self
            .selections
            .with_toggled(category_id, option_id, category.multi_select);
        tracing::debug!(
            category = category_id,
            option = option_id,
            selected = self.selections.is_selected(category_id, option_id),
            "selection toggled"
        );
        Ok(())
    }

    pub fn is_selected(&self, category_id: &str, option_id: &str) -> bool {
        self.selections.is_selected(category_id, option_id)
    }

    pub fn total_selected(&self) -> usize {
        self.selections.total_selected()
    }

    /// `None` until something is selected.
    pub fn quote(&self) -> Option<QuoteResult> {
        if self.selections.is_empty() {
            return None;
        }
        Some(calculate_quote(&self.catalog, &self.selections, &self.pricing))
    }

    pub fn total_steps(&self) -> usize {
        self.catalog.len()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The category shown at the current step; `None` on the summary step.
    pub fn current_category(&self) -> Option<&ServiceCategory> {
        self.catalog.categories.get(self.current_step)
    }

    pub fn next_step(&mut self) {
        self.current_step = (self.current_step + 1).min(self.total_steps());
    }

    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn begin_review(&mut self) -> Result<()> {
        self.expect_stage("review the quote", &[CheckoutStage::Configure])?;
        if self.selections.is_empty() {
            return Err(EstimatorError::NoSelections);
        }
        self.stage = CheckoutStage::Review;
        Ok(())
    }

    pub fn proceed_to_payment(&mut self) -> Result<()> {
        self.expect_stage("proceed to payment", &[CheckoutStage::Review])?;
        self.stage = CheckoutStage::Payment;
        Ok(())
    }

    pub fn back_to_configure(&mut self) -> Result<()> {
        self.expect_stage(
            "edit the selection",
            &[CheckoutStage::Review, CheckoutStage::Payment],
        )?;
        self.stage = CheckoutStage::Configure;
        Ok(())
    }

    fn expect_stage(&self, action: &str, allowed: &[CheckoutStage]) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(EstimatorError::InvalidTransition {
                action: action.to_string(),
                stage: self.stage.to_string(),
            })
        }
    }

    pub fn submit_status(&self) -> &SubmitStatus {
        &self.submit_status
    }

    /// Sends the current quote from the payment stage. A failed attempt leaves
    /// nothing behind and can be retried.
    pub async fn submit(&mut self, form: &QuoteFormData) -> Result<SubmissionReceipt> {
        let quote = self.quote().ok_or(EstimatorError::NoSelections)?;
        self.expect_stage("submit the quote", &[CheckoutStage::Payment])?;
        form.validate()?;

        self.submit_status = SubmitStatus::Submitting;
        match self.sink.submit(form, &quote).await {
            Ok(receipt) => {
                tracing::info!(
                    submission_id = receipt.submission_id,
                    total_price = quote.total_price,
                    "quote submitted"
                );
                self.submit_status = SubmitStatus::Success {
                    message: receipt.message.clone(),
                    submission_id: receipt.submission_id,
                };
                self.stage = CheckoutStage::Success;
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!("quote submission failed: {}", e);
                self.submit_status = SubmitStatus::Error {
                    message: e.user_friendly_message(),
                };
                Err(e)
            }
        }
    }

    /// Back to an empty selection on the first step. Loaded pricing is kept.
    pub fn reset(&mut self) {
        self.selections = Selections::new();
        self.current_step = 0;
        self.stage = CheckoutStage::Configure;
        self.submit_status = SubmitStatus::Idle;
    }
}
