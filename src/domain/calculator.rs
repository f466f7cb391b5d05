use crate::domain::model::{Catalog, PricingConfig, QuoteResult, SelectedService, Tier};
use crate::domain::selections::Selections;

/// Prices a selection against the catalog.
///
/// Unknown category or option ids contribute nothing. Add-on durations run in
/// parallel (maximum); the project type's duration is sequential and added on
/// top. The reported timeline is never shorter than one week.
pub fn calculate_quote(
    catalog: &Catalog,
    selections: &Selections,
    pricing: &PricingConfig,
) -> QuoteResult {
    let mut selected_services = Vec::new();
    let mut gross_price = 0.0;
    let mut total_weeks = 0u32;

    for category in &catalog.categories {
        for option in category
            .options
            .iter()
            .filter(|o| selections.is_selected(&category.id, &o.id))
        {
            selected_services.push(SelectedService {
                category_title: category.title.clone(),
                option_label: option.label.clone(),
                price: option.base_price,
                weeks: option.timeline_weeks,
            });
            gross_price += option.base_price;
            total_weeks = total_weeks.max(option.timeline_weeks);
        }
    }

    if let Some(project_type) = catalog.project_type() {
        let base = selections
            .selected(&project_type.id)
            .find_map(|id| project_type.option(id));
        if let Some(option) = base {
            total_weeks += option.timeline_weeks;
        }
    }

    let discount = if gross_price > pricing.discount_threshold {
        gross_price * pricing.discount_rate()
    } else {
        0.0
    };
    let final_price = gross_price - discount;

    let tier = if final_price > pricing.enterprise_above {
        Tier::Enterprise
    } else if final_price > pricing.professional_above {
        Tier::Professional
    } else {
        Tier::Starter
    };

    tracing::debug!(
        services = selected_services.len(),
        gross_price,
        discount,
        %tier,
        "quote calculated"
    );

    QuoteResult {
        total_price: round_price(final_price),
        min_price: round_price(final_price * pricing.band_low),
        max_price: round_price(final_price * pricing.band_high),
        total_weeks: total_weeks.max(1),
        selected_services,
        tier,
        gross_price,
        discount,
    }
}

fn round_price(amount: f64) -> u64 {
    amount.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ServiceCategory, ServiceOption};

    fn option(id: &str, price: f64, weeks: u32) -> ServiceOption {
        ServiceOption {
            id: id.to_string(),
            label: id.to_uppercase(),
            description: String::new(),
            base_price: price,
            timeline_weeks: weeks,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            "test",
            vec![
                ServiceCategory {
                    id: "type".to_string(),
                    title: "Type".to_string(),
                    icon: String::new(),
                    multi_select: false,
                    options: vec![option("small", 800.0, 2), option("big", 5001.0, 4)],
                },
                ServiceCategory {
                    id: "extras".to_string(),
                    title: "Extras".to_string(),
                    icon: String::new(),
                    multi_select: true,
                    options: vec![
                        option("a", 100.0, 1),
                        option("b", 4100.0, 3),
                        option("c", 3199.0, 0),
                    ],
                },
            ],
        )
    }

    #[test]
    fn test_band_and_rounding() {
        let sel = Selections::new().with_toggled("type", "small", false);
        let quote = calculate_quote(&catalog(), &sel, &PricingConfig::default());

        assert_eq!(quote.total_price, 800);
        assert_eq!(quote.min_price, 720);
        assert_eq!(quote.max_price, 920);
        assert_eq!(quote.total_weeks, 4);
    }

    #[test]
    fn test_tier_cutoffs_are_strict() {
        let pricing = PricingConfig::default();

        // 800 + 100 + 4100 = 5000: no discount, professional.
        let sel = Selections::new()
            .with_toggled("type", "small", false)
            .with_toggled("extras", "a", true)
            .with_toggled("extras", "b", true);
        let quote = calculate_quote(&catalog(), &sel, &pricing);
        assert_eq!(quote.discount, 0.0);
        assert_eq!(quote.tier, Tier::Professional);

        // A price exactly at the cutoff stays in the lower tier.
        let mut at_cutoff = pricing.clone();
        at_cutoff.professional_above = 800.0;
        let sel = Selections::new().with_toggled("type", "small", false);
        assert_eq!(calculate_quote(&catalog(), &sel, &at_cutoff).tier, Tier::Starter);
    }

    #[test]
    fn test_enterprise_after_discount() {
        // 5001 + 4100 + 3199 = 12300, minus 10% = 11070.
        let sel = Selections::new()
            .with_toggled("type", "big", false)
            .with_toggled("extras", "b", true)
            .with_toggled("extras", "c", true);
        let quote = calculate_quote(&catalog(), &sel, &PricingConfig::default());

        assert_eq!(quote.gross_price, 12300.0);
        assert_eq!(quote.total_price, 11070);
        assert_eq!(quote.tier, Tier::Enterprise);
        // max(4, 3, 0) in parallel plus the 4-week base.
        assert_eq!(quote.total_weeks, 8);
    }

    #[test]
    fn test_services_follow_catalog_order() {
        let sel = Selections::new()
            .with_toggled("extras", "c", true)
            .with_toggled("extras", "a", true)
            .with_toggled("type", "small", false);
        let quote = calculate_quote(&catalog(), &sel, &PricingConfig::default());

        let labels: Vec<&str> = quote
            .selected_services
            .iter()
            .map(|s| s.option_label.as_str())
            .collect();
        assert_eq!(labels, vec!["SMALL", "A", "C"]);
    }
}
