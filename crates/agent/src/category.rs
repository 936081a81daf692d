use shopchat_core::domain::product::{Category, PriceSort};

/// A category resolution plus an optional sort preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryHint {
    pub category: Category,
    pub sort: Option<PriceSort>,
}

struct CategoryRule {
    keywords: &'static [&'static str],
    category: Category,
}

/// Ordered rule table; the first matching rule wins and later rules are not
/// evaluated. The ordering is a deliberate tie-break: "phone" + "camera"
/// resolves to smartphones because that rule comes first.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule { keywords: &["laptop", "computer", "notebook"], category: Category::Laptops },
    CategoryRule { keywords: &["phone", "smartphone", "mobile"], category: Category::Smartphones },
    CategoryRule {
        keywords: &["headphone", "earphone", "earbuds", "audio", "speaker", "wireless"],
        category: Category::Audio,
    },
    CategoryRule {
        keywords: &["watch", "smartwatch", "fitness", "wearable"],
        category: Category::Wearables,
    },
    CategoryRule { keywords: &["tablet", "ipad"], category: Category::Tablets },
    CategoryRule { keywords: &["camera", "photography"], category: Category::Cameras },
    CategoryRule {
        keywords: &["keyboard", "mouse", "accessory"],
        category: Category::Accessories,
    },
];

/// Map lower-cased text onto the fixed category set. Gaming laptop queries
/// sort descending by price (the pricier machines are the gaming machines
/// in this catalog); plain laptop queries sort ascending.
pub fn match_category(normalized_text: &str) -> Option<CategoryHint> {
    let rule = CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| normalized_text.contains(keyword)))?;

    let sort = match rule.category {
        Category::Laptops if normalized_text.contains("gaming") => Some(PriceSort::Descending),
        Category::Laptops => Some(PriceSort::Ascending),
        _ => None,
    };

    Some(CategoryHint { category: rule.category, sort })
}

/// Whether the text carries any catalog vocabulary at all; used by the
/// intent router's product-search rule.
pub fn has_category_vocabulary(normalized_text: &str) -> bool {
    CATEGORY_RULES
        .iter()
        .any(|rule| rule.keywords.iter().any(|keyword| normalized_text.contains(keyword)))
}

#[cfg(test)]
mod tests {
    use shopchat_core::domain::product::{Category, PriceSort};

    use super::{has_category_vocabulary, match_category};

    #[test]
    fn each_category_is_reachable() {
        let cases = [
            ("cheap notebook for school", Category::Laptops),
            ("new smartphone please", Category::Smartphones),
            ("bluetooth speaker", Category::Audio),
            ("fitness tracker", Category::Wearables),
            ("ipad for drawing", Category::Tablets),
            ("photography gear", Category::Cameras),
            ("mechanical keyboard", Category::Accessories),
        ];

        for (text, expected) in cases {
            let hint = match_category(text).unwrap_or_else(|| panic!("no category for `{text}`"));
            assert_eq!(hint.category, expected, "text: {text}");
        }
    }

    #[test]
    fn phone_beats_camera_by_rule_order() {
        let hint = match_category("phone with a great camera").expect("category");
        assert_eq!(hint.category, Category::Smartphones);
    }

    #[test]
    fn gaming_laptops_sort_descending() {
        let hint = match_category("gaming laptop").expect("category");
        assert_eq!(hint.category, Category::Laptops);
        assert_eq!(hint.sort, Some(PriceSort::Descending));
    }

    #[test]
    fn plain_laptops_sort_ascending() {
        let hint = match_category("laptop for travel").expect("category");
        assert_eq!(hint.sort, Some(PriceSort::Ascending));
    }

    #[test]
    fn non_laptop_rules_leave_sort_unset() {
        let hint = match_category("wireless earbuds").expect("category");
        assert_eq!(hint.sort, None);
    }

    #[test]
    fn unmatched_text_yields_no_category() {
        assert_eq!(match_category("show me everything"), None);
        assert!(!has_category_vocabulary("show me everything"));
    }

    #[test]
    fn vocabulary_probe_sees_any_rule_keyword() {
        assert!(has_category_vocabulary("any speaker deals"));
        assert!(has_category_vocabulary("smartwatch bands"));
    }
}
