use crate::config::catalog::default_catalog;
use crate::domain::model::{Catalog, PricingConfig, RemotePricing};
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub pricing: PricingSection,
    #[serde(default)]
    pub tiers: TierSection,
    #[serde(default)]
    pub price_band: PriceBandSection,
    #[serde(default)]
    pub backend: BackendSection,
    pub catalog: Option<CatalogSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    pub currency: String,
    pub discount_threshold: f64,
    pub discount_percentage: f64,
}

impl Default for PricingSection {
    fn default() -> Self {
        let remote = RemotePricing::default();
        Self {
            currency: remote.currency,
            discount_threshold: remote.discount_threshold,
            discount_percentage: remote.discount_percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSection {
    pub professional_above: f64,
    pub enterprise_above: f64,
}

impl Default for TierSection {
    fn default() -> Self {
        let defaults = PricingConfig::default();
        Self {
            professional_above: defaults.professional_above,
            enterprise_above: defaults.enterprise_above,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBandSection {
    pub low: f64,
    pub high: f64,
}

impl Default for PriceBandSection {
    fn default() -> Self {
        let defaults = PricingConfig::default();
        Self {
            low: defaults.band_low,
            high: defaults.band_high,
        }
    }
}

/// Mock backend behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub config_delay_ms: u64,
    pub submit_delay_ms: u64,
    pub failure_probability: f64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            config_delay_ms: 600,
            submit_delay_ms: 1200,
            failure_probability: 0.1,
        }
    }
}

impl BackendSection {
    pub fn config_delay(&self) -> Duration {
        Duration::from_millis(self.config_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub path: PathBuf,
}

impl EstimatorConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EstimatorError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        // Relative catalog paths are resolved against the config file.
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.as_ref().parent()) {
            if catalog.path.is_relative() {
                catalog.path = dir.join(&catalog.path);
            }
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EstimatorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders from the environment; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Applies a command-line override; call `validate` afterwards.
    pub fn with_failure_probability(mut self, probability: Option<f64>) -> Self {
        if let Some(p) = probability {
            self.backend.failure_probability = p;
        }
        self
    }

    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            currency: self.pricing.currency.clone(),
            discount_threshold: self.pricing.discount_threshold,
            discount_percentage: self.pricing.discount_percentage,
            professional_above: self.tiers.professional_above,
            enterprise_above: self.tiers.enterprise_above,
            band_low: self.price_band.low,
            band_high: self.price_band.high,
        }
    }

    /// The values the mock config source publishes.
    pub fn remote_pricing(&self) -> RemotePricing {
        RemotePricing {
            currency: self.pricing.currency.clone(),
            discount_threshold: self.pricing.discount_threshold,
            discount_percentage: self.pricing.discount_percentage,
        }
    }

    /// The configured catalog file, or the built-in catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(section) => Catalog::from_file(&section.path),
            None => Ok(default_catalog()),
        }
    }
}

impl Validate for EstimatorConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pricing.currency", &self.pricing.currency)?;
        validate_non_negative("pricing.discount_threshold", self.pricing.discount_threshold)?;
        validate_range(
            "pricing.discount_percentage",
            self.pricing.discount_percentage,
            0.0,
            100.0,
        )?;
        validate_non_negative("tiers.professional_above", self.tiers.professional_above)?;
        validate_non_negative("tiers.enterprise_above", self.tiers.enterprise_above)?;
        if self.tiers.enterprise_above < self.tiers.professional_above {
            return Err(EstimatorError::InvalidConfigValueError {
                field: "tiers.enterprise_above".to_string(),
                value: self.tiers.enterprise_above.to_string(),
                reason: "Must not be below tiers.professional_above".to_string(),
            });
        }
        validate_non_negative("price_band.low", self.price_band.low)?;
        if !(self.price_band.high >= self.price_band.low) {
            return Err(EstimatorError::InvalidConfigValueError {
                field: "price_band.high".to_string(),
                value: self.price_band.high.to_string(),
                reason: "Must not be below price_band.low".to_string(),
            });
        }
        validate_range(
            "backend.failure_probability",
            self.backend.failure_probability,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}
