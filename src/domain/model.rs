use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::{validate_email, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub base_price: f64,
    #[serde(default)]
    pub timeline_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub multi_select: bool,
    pub options: Vec<ServiceOption>,
}

impl ServiceCategory {
    pub fn option(&self, option_id: &str) -> Option<&ServiceOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

fn default_catalog_version() -> String {
    "1".to_string()
}

/// Ordered, read-only list of categories. The first category is the project type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_catalog_version")]
    pub version: String,
    pub categories: Vec<ServiceCategory>,
}

impl Catalog {
    pub fn new(version: impl Into<String>, categories: Vec<ServiceCategory>) -> Self {
        Self {
            version: version.into(),
            categories,
        }
    }

    pub fn category(&self, category_id: &str) -> Option<&ServiceCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Sequential base work; its duration is added on top of the parallel add-ons.
    pub fn project_type(&self) -> Option<&ServiceCategory> {
        self.categories.first()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Starter,
    Professional,
    Enterprise,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Starter => "starter",
            Tier::Professional => "professional",
            Tier::Enterprise => "enterprise",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedService {
    pub category_title: String,
    pub option_label: String,
    pub price: f64,
    pub weeks: u32,
}

/// Derived from a catalog and a selection; recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// Discounted price, rounded to whole units.
    pub total_price: u64,
    pub min_price: u64,
    pub max_price: u64,
    pub total_weeks: u32,
    pub selected_services: Vec<SelectedService>,
    pub tier: Tier,
    /// Sum of selected prices before the volume discount.
    pub gross_price: f64,
    pub discount: f64,
}

/// Everything the calculator needs besides the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingConfig {
    pub currency: String,
    pub discount_threshold: f64,
    pub discount_percentage: f64,
    pub professional_above: f64,
    pub enterprise_above: f64,
    pub band_low: f64,
    pub band_high: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "CHF".to_string(),
            discount_threshold: 5000.0,
            discount_percentage: 10.0,
            professional_above: 3000.0,
            enterprise_above: 8000.0,
            band_low: 0.9,
            band_high: 1.15,
        }
    }
}

impl PricingConfig {
    pub fn discount_rate(&self) -> f64 {
        self.discount_percentage / 100.0
    }

    /// Remote values win over local ones; tier cutoffs and the band stay local.
    pub fn apply_remote(&mut self, remote: &RemotePricing) {
        self.currency = remote.currency.clone();
        self.discount_threshold = remote.discount_threshold;
        self.discount_percentage = remote.discount_percentage;
    }
}

/// Live-tunable pricing values published by the config source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePricing {
    pub currency: String,
    pub discount_threshold: f64,
    pub discount_percentage: f64,
}

impl Default for RemotePricing {
    fn default() -> Self {
        let defaults = PricingConfig::default();
        Self {
            currency: defaults.currency,
            discount_threshold: defaults.discount_threshold,
            discount_percentage: defaults.discount_percentage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteFormData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub message: String,
}

impl Validate for QuoteFormData {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EstimatorError::ValidationError {
                message: "name is required".to_string(),
            });
        }
        validate_email("email", &self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
    pub submission_id: u32,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_deserializes_from_camel_case_json() {
        let json = r#"{
            "id": "features",
            "title": "Features",
            "multiSelect": true,
            "options": [
                {"id": "blog", "label": "Blog", "basePrice": 400, "timelineWeeks": 1}
            ]
        }"#;

        let category: ServiceCategory = serde_json::from_str(json).unwrap();
        assert!(category.multi_select);
        assert_eq!(category.icon, "");
        assert_eq!(category.option("blog").unwrap().base_price, 400.0);
        assert!(category.option("seo").is_none());
    }

    #[test]
    fn test_remote_pricing_overrides_discount_only() {
        let mut pricing = PricingConfig::default();
        pricing.apply_remote(&RemotePricing {
            currency: "EUR".to_string(),
            discount_threshold: 2000.0,
            discount_percentage: 15.0,
        });

        assert_eq!(pricing.currency, "EUR");
        assert_eq!(pricing.discount_threshold, 2000.0);
        assert!((pricing.discount_rate() - 0.15).abs() < f64::EPSILON);
        assert_eq!(pricing.enterprise_above, 8000.0);
    }

    #[test]
    fn test_form_validation() {
        let mut form = QuoteFormData {
            name: "Anna".to_string(),
            email: "anna@example.ch".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());

        form.email = "not-an-email".to_string();
        assert!(form.validate().is_err());

        form.email = "anna@example.ch".to_string();
        form.name = "   ".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Professional).unwrap(), "\"professional\"");
        assert_eq!(Tier::Enterprise.to_string(), "enterprise");
    }
}
