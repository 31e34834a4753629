//! Confidence-gated category refinement
//!
//! The extraction collaborator assigns a category and a confidence score to
//! every candidate transaction. Above the trust threshold its judgment
//! stands; below it, keyword heuristics over the description may override
//! the category. No keyword match leaves the category unchanged - a silent
//! fallback, not an error.

use crate::models::Category;

/// Extraction confidence at or above which the assigned category is trusted.
pub const CONFIDENCE_TRUST_THRESHOLD: f64 = 0.6;

/// Keyword lists per category, checked in this order. The first list
/// containing a substring of the lower-cased description wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodDining,
        &[
            "restaurant", "cafe", "food", "dining", "pizza", "burger", "coffee",
            "starbucks", "mcdonald", "kfc",
        ],
    ),
    (
        Category::TransportMobility,
        &[
            "uber", "grab", "taxi", "fuel", "gas", "parking", "toll", "transport",
            "bus", "train",
        ],
    ),
    (
        Category::BillsUtilities,
        &[
            "electric", "water", "internet", "phone", "utility", "bill",
            "subscription", "netflix", "spotify",
        ],
    ),
    (
        Category::ShoppingEntertainment,
        &[
            "amazon", "shop", "store", "mall", "cinema", "movie", "game",
            "entertainment", "retail",
        ],
    ),
    (
        Category::Income,
        &[
            "salary", "wage", "income", "deposit", "transfer", "payment", "refund",
        ],
    ),
];

/// Refine a category assignment using keyword heuristics.
///
/// Pure and total: always returns a member of the closed category set.
pub fn refine_category(description: &str, category: Category, confidence: f64) -> Category {
    if confidence >= CONFIDENCE_TRUST_THRESHOLD {
        return category;
    }

    let description = description.to_lowercase();
    for (candidate, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| description.contains(kw)) {
            return *candidate;
        }
    }

    category
}
