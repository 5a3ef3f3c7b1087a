//! Keyword-based product categorization.
//!
//! The rule table is ordered: the first category with a keyword contained
//! in the lower-cased product name wins. No match falls back to `Other`.

use crate::types::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|kw| name_lower.contains(kw.as_str()))
    }
}

/// The built-in rule table, in match order.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::ElectronicsHome,
            &["electronic", "cable", "charger", "adapter", "battery",
              "home", "kitchen", "appliance", "tool"],
        ),
        CategoryRule::new(
            Category::Fragrances,
            &["perfume", "cologne", "fragrance", "scent", "eau de"],
        ),
        CategoryRule::new(
            Category::BeautySkincare,
            &["beauty", "skincare", "cream", "lotion", "makeup",
              "cosmetic", "serum", "face"],
        ),
        CategoryRule::new(
            Category::ConsumablesHealth,
            &["vitamin", "supplement", "health", "protein",
              "snack", "food", "drink", "consumable"],
        ),
        CategoryRule::new(
            Category::CollectiblesToys,
            &["toy", "collectible", "figure", "game", "puzzle", "lego"],
        ),
        CategoryRule::new(
            Category::ApparelFootwear,
            &["shirt", "pants", "shoes", "clothing", "apparel",
              "jacket", "dress", "footwear"],
        ),
        CategoryRule::new(
            Category::Drinkware,
            &["mug", "cup", "bottle", "tumbler", "glass", "drinkware"],
        ),
        CategoryRule::new(
            Category::Sports,
            &["sport", "fitness", "exercise", "gym", "outdoor", "athletic"],
        ),
        CategoryRule::new(
            Category::MediaEntertainment,
            &["book", "dvd", "cd", "media", "movie", "music"],
        ),
    ]
}

/// Categorizer over a fixed, ordered rule table.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Categorizer {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        // Keywords are matched against a lower-cased name.
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn categorize(&self, product_name: &str) -> Category {
        let name_lower = product_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name_lower))
            .map(|rule| rule.category)
            .unwrap_or(Category::Other)
    }
}

/// Categorize with the built-in rule table.
pub fn assign_category(product_name: &str) -> Category {
    Categorizer::default().categorize(product_name)
}
