use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Price constraints pulled out of a message. At most one of
/// {max/min, target} is effective: a target phrase supersedes explicit
/// bounds entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceConstraints {
    pub max_price: Option<u32>,
    pub min_price: Option<u32>,
    pub target_price: Option<u32>,
}

/// Resolved inclusive bounds ready for the catalog store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceBounds {
    pub floor: Option<Decimal>,
    pub ceiling: Option<Decimal>,
}

fn max_price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:under|below|less than)\s*\$?\s*(\d+)")
            .expect("max price pattern is a valid regex")
    })
}

fn min_price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:over|above|more than)\s*\$?\s*(\d+)")
            .expect("min price pattern is a valid regex")
    })
}

fn target_price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:around|about)\s*\$?\s*(\d+)")
            .expect("target price pattern is a valid regex")
    })
}

fn bare_amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\$\s*\d+").expect("bare amount pattern is a valid regex"))
}

impl PriceConstraints {
    /// First match wins per group, scanned left to right. A phrase without
    /// digits never matches, so malformed amounts simply leave the field
    /// unset.
    pub fn extract(text: &str) -> Self {
        Self {
            max_price: first_amount(max_price_pattern(), text),
            min_price: first_amount(min_price_pattern(), text),
            target_price: first_amount(target_price_pattern(), text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_price.is_none() && self.min_price.is_none() && self.target_price.is_none()
    }

    /// A target collapses to a symmetric band of 80%..120% of the amount;
    /// otherwise explicit bounds pass through inclusively.
    pub fn bounds(&self) -> PriceBounds {
        if let Some(target) = self.target_price {
            let target = Decimal::from(target);
            return PriceBounds {
                floor: Some(target * Decimal::new(8, 1)),
                ceiling: Some(target * Decimal::new(12, 1)),
            };
        }

        PriceBounds {
            floor: self.min_price.map(Decimal::from),
            ceiling: self.max_price.map(Decimal::from),
        }
    }

    /// Short filter wording for reply summaries.
    pub fn describe(&self) -> Option<String> {
        if let Some(target) = self.target_price {
            return Some(format!("around ${target}"));
        }

        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some(format!("between ${min} and ${max}")),
            (Some(min), None) => Some(format!("over ${min}")),
            (None, Some(max)) => Some(format!("under ${max}")),
            (None, None) => None,
        }
    }
}

fn first_amount(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().parse().ok())
}

/// Remove every recognized price phrase (and leftover bare `$N` amounts) so
/// the keyword fallback does not chase dollar figures as search terms.
pub fn strip_price_phrases(text: &str) -> String {
    let stripped = max_price_pattern().replace_all(text, " ");
    let stripped = min_price_pattern().replace_all(&stripped, " ");
    let stripped = target_price_pattern().replace_all(&stripped, " ");
    bare_amount_pattern().replace_all(&stripped, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{strip_price_phrases, PriceConstraints};

    #[test]
    fn under_sets_only_max_price() {
        let constraints = PriceConstraints::extract("show me headphones under $100");
        assert_eq!(constraints.max_price, Some(100));
        assert_eq!(constraints.min_price, None);
        assert_eq!(constraints.target_price, None);
    }

    #[test]
    fn phrase_synonyms_all_match() {
        assert_eq!(PriceConstraints::extract("below 250").max_price, Some(250));
        assert_eq!(PriceConstraints::extract("less than $80").max_price, Some(80));
        assert_eq!(PriceConstraints::extract("above $40").min_price, Some(40));
        assert_eq!(PriceConstraints::extract("more than 500").min_price, Some(500));
        assert_eq!(PriceConstraints::extract("about $60").target_price, Some(60));
    }

    #[test]
    fn first_match_wins_per_group() {
        let constraints = PriceConstraints::extract("under $100 or maybe under $200");
        assert_eq!(constraints.max_price, Some(100));
    }

    #[test]
    fn conflicting_bounds_are_both_applied() {
        let constraints = PriceConstraints::extract("over $50 but under $100");
        let bounds = constraints.bounds();
        assert_eq!(bounds.floor, Some(Decimal::from(50)));
        assert_eq!(bounds.ceiling, Some(Decimal::from(100)));
    }

    #[test]
    fn target_supersedes_explicit_bounds() {
        let constraints = PriceConstraints::extract("under $500 around $200");
        assert_eq!(constraints.target_price, Some(200));

        let bounds = constraints.bounds();
        assert_eq!(bounds.floor, Some(Decimal::from(160)));
        assert_eq!(bounds.ceiling, Some(Decimal::from(240)));
    }

    #[test]
    fn target_band_is_eighty_to_one_twenty_percent() {
        let bounds = PriceConstraints::extract("around $99").bounds();
        assert_eq!(bounds.floor, Some(Decimal::new(792, 1)));
        assert_eq!(bounds.ceiling, Some(Decimal::new(1188, 1)));
    }

    #[test]
    fn malformed_amounts_never_match() {
        let constraints = PriceConstraints::extract("keep it under $ but cheap");
        assert!(constraints.is_empty());
        assert_eq!(constraints.bounds(), Default::default());
    }

    #[test]
    fn describe_summarizes_active_filters() {
        assert_eq!(
            PriceConstraints::extract("under $100").describe().as_deref(),
            Some("under $100")
        );
        assert_eq!(
            PriceConstraints::extract("over $50 under $100").describe().as_deref(),
            Some("between $50 and $100")
        );
        assert_eq!(
            PriceConstraints::extract("around $200").describe().as_deref(),
            Some("around $200")
        );
        assert_eq!(PriceConstraints::extract("any headphones").describe(), None);
    }

    #[test]
    fn stripping_removes_price_phrases_and_bare_amounts() {
        let stripped = strip_price_phrases("wireless headphones under $100 near $ 20");
        assert!(stripped.contains("wireless"));
        assert!(stripped.contains("headphones"));
        assert!(!stripped.contains("100"));
        assert!(!stripped.contains("20"));
    }
}
