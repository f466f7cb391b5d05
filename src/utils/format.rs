use crate::domain::model::Tier;

/// Whole-unit amount with Swiss digit grouping, e.g. `CHF 12’500`.
pub fn format_price(amount: u64, currency: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('’');
        }
        grouped.push(ch);
    }
    format!("{} {}", currency, grouped)
}

/// Rounds a fractional amount (such as a discount) before formatting.
pub fn format_amount(amount: f64, currency: &str) -> String {
    format_price(amount.max(0.0).round() as u64, currency)
}

pub fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Starter => "Starter Package",
        Tier::Professional => "Professional Package",
        Tier::Enterprise => "Enterprise Package",
    }
}

pub fn format_weeks(weeks: u32) -> String {
    if weeks == 1 {
        "1 week".to_string()
    } else {
        format!("{} weeks", weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_grouping() {
        assert_eq!(format_price(0, "CHF"), "CHF 0");
        assert_eq!(format_price(800, "CHF"), "CHF 800");
        assert_eq!(format_price(4501, "CHF"), "CHF 4’501");
        assert_eq!(format_price(1_234_567, "EUR"), "EUR 1’234’567");
    }

    #[test]
    fn test_format_amount_rounds() {
        assert_eq!(format_amount(500.1, "CHF"), "CHF 500");
        assert_eq!(format_amount(1249.5, "CHF"), "CHF 1’250");
    }

    #[test]
    fn test_labels() {
        assert_eq!(tier_label(Tier::Enterprise), "Enterprise Package");
        assert_eq!(format_weeks(1), "1 week");
        assert_eq!(format_weeks(5), "5 weeks");
    }
}
