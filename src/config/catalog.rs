use crate::domain::model::{Catalog, ServiceCategory, ServiceOption};
use crate::utils::error::{EstimatorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_unique_ids, Validate,
};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CATALOG_VERSION: &str = "2024.1";

fn opt(id: &str, label: &str, description: &str, base_price: f64, timeline_weeks: u32) -> ServiceOption {
    ServiceOption {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        base_price,
        timeline_weeks,
    }
}

fn category(
    id: &str,
    title: &str,
    icon: &str,
    multi_select: bool,
    options: Vec<ServiceOption>,
) -> ServiceCategory {
    ServiceCategory {
        id: id.to_string(),
        title: title.to_string(),
        icon: icon.to_string(),
        multi_select,
        options,
    }
}

/// The built-in WordPress project catalog.
pub fn default_catalog() -> Catalog {
    Catalog::new(
        DEFAULT_CATALOG_VERSION,
        vec![
            category(
                "project_type",
                "Project Type",
                "🚀",
                false,
                vec![
                    opt("landing_page", "Landing Page", "Single page, conversion-focused website", 800.0, 1),
                    opt("business_website", "Business Website", "5-10 pages with contact forms", 2500.0, 3),
                    opt("ecommerce", "E-Commerce Store", "WooCommerce with product catalog", 5000.0, 6),
                    opt("custom_web_app", "Custom Web App", "Complex application with user authentication", 9000.0, 10),
                ],
            ),
            category(
                "design",
                "Design",
                "🎨",
                false,
                vec![
                    opt("template", "Premium Template", "Customized premium WordPress theme", 300.0, 1),
                    opt("custom_design", "Custom Design", "Unique design built from scratch", 1500.0, 2),
                    opt("ui_system", "Full UI System", "Complete design system with Figma files", 3000.0, 3),
                ],
            ),
            category(
                "features",
                "Features & Integrations",
                "⚡",
                true,
                vec![
                    opt("contact_form", "Contact Form", "Advanced forms with email notifications", 150.0, 0),
                    opt("blog", "Blog / News Section", "Full blog with categories and search", 400.0, 1),
                    opt("multilingual", "Multilingual (WPML)", "Site in 2-3 languages", 600.0, 1),
                    opt("react_component", "React Interactive Feature", "Custom React component (calculator, quiz, etc.)", 800.0, 1),
                    opt("api_integration", "Third-Party API", "CRM, payment, maps, or data integration", 700.0, 1),
                    opt("seo", "SEO Optimization", "Technical SEO, sitemap, schema markup", 300.0, 0),
                ],
            ),
            category(
                "performance",
                "Performance & Security",
                "🛡️",
                true,
                vec![
                    opt("basic", "Basic (Caching + SSL)", "Standard speed optimization and HTTPS", 200.0, 0),
                    opt("advanced_perf", "Advanced Performance", "CDN, image optimization, 90+ PageSpeed score", 500.0, 1),
                    opt("security", "Security Hardening", "Firewall, malware scanning, backup system", 400.0, 0),
                ],
            ),
            category(
                "support",
                "Ongoing Support",
                "🔧",
                false,
                vec![
                    opt("no_support", "No Support Needed", "One-time project delivery", 0.0, 0),
                    opt("basic_support", "Basic Support (3 months)", "Bug fixes and minor updates", 300.0, 0),
                    opt("full_support", "Full Maintenance (1 year)", "Updates, backups, security monitoring", 900.0, 0),
                ],
            ),
        ],
    )
}

/// JSON catalogs may be a bare array of categories or a versioned object.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    Versioned(Catalog),
    Bare(Vec<ServiceCategory>),
}

impl Catalog {
    /// Loads a catalog, picking the format from the file extension (`.json` or `.toml`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(EstimatorError::IoError)?;

        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(EstimatorError::InvalidConfigValueError {
                    field: "catalog.path".to_string(),
                    value: path.display().to_string(),
                    reason: format!(
                        "Unsupported catalog extension {:?}. Use .json or .toml",
                        other.unwrap_or("")
                    ),
                })
            }
        };

        tracing::info!(
            path = %path.display(),
            version = %catalog.version,
            categories = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog = match serde_json::from_str::<JsonCatalog>(content)? {
            JsonCatalog::Versioned(catalog) => catalog,
            JsonCatalog::Bare(categories) => Catalog::new(DEFAULT_CATALOG_VERSION, categories),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog =
            toml::from_str(content).map_err(|e| EstimatorError::ConfigValidationError {
                field: "catalog".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }
}

impl Validate for Catalog {
    fn validate(&self) -> Result<()> {
        let project_type = self
            .project_type()
            .ok_or_else(|| EstimatorError::MissingConfigError {
                field: "categories".to_string(),
            })?;
        if project_type.multi_select {
            return Err(EstimatorError::InvalidConfigValueError {
                field: "categories[0].multiSelect".to_string(),
                value: "true".to_string(),
                reason: "The first category is the project type and must be single-select"
                    .to_string(),
            });
        }

        validate_unique_ids("categories", self.categories.iter().map(|c| c.id.as_str()))?;

        for category in &self.categories {
            validate_non_empty_string("categories.id", &category.id)?;
            if category.options.is_empty() {
                return Err(EstimatorError::InvalidConfigValueError {
                    field: format!("categories.{}.options", category.id),
                    value: "[]".to_string(),
                    reason: "A category needs at least one option".to_string(),
                });
            }
            validate_unique_ids(
                &format!("categories.{}.options", category.id),
                category.options.iter().map(|o| o.id.as_str()),
            )?;
            for option in &category.options {
                validate_non_empty_string(&format!("categories.{}.options.id", category.id), &option.id)?;
                validate_non_negative(
                    &format!("categories.{}.options.{}.basePrice", category.id, option.id),
                    option.base_price,
                )?;
            }
        }

        Ok(())
    }
}
