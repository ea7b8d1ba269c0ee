//! Credit package catalog.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Fixed-price conversion of points into credits.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::find_package;
///
/// let standard = find_package("standard").unwrap();
/// assert_eq!(standard.total_credits(), 6);
/// assert_eq!(*standard.points_cost(), 20);
/// assert_eq!(standard.display_rate(), 3.3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct CreditPackage {
    /// Catalog id
    id: String,
    /// Display name
    name: String,
    /// Credits granted
    credits_granted: i64,
    /// Extra credits granted on top
    bonus_credits: i64,
    /// Price in points
    points_cost: i64,
    /// Highlighted in the shop
    popular: bool,
}

impl CreditPackage {
    /// Build a package. Cost and total credits must both be positive.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        credits_granted: i64,
        bonus_credits: i64,
        points_cost: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credits_granted,
            bonus_credits,
            points_cost,
            popular: false,
        }
    }

    fn highlighted(mut self) -> Self {
        self.popular = true;
        self
    }

    /// Credits the buyer receives, bonus included.
    pub fn total_credits(&self) -> i64 {
        self.credits_granted + self.bonus_credits
    }

    /// Points paid per credit received.
    pub fn exchange_rate(&self) -> f64 {
        self.points_cost as f64 / self.total_credits() as f64
    }

    /// Exchange rate rounded to one decimal for display.
    pub fn display_rate(&self) -> f64 {
        (self.exchange_rate() * 10.0).round() / 10.0
    }
}

/// The static package catalog, cheapest first.
pub fn credit_catalog() -> Vec<CreditPackage> {
    vec![
        CreditPackage::new("basic", "Basic", 1, 0, 5),
        CreditPackage::new("standard", "Standard", 5, 1, 20).highlighted(),
        CreditPackage::new("premium", "Premium", 12, 3, 40),
        CreditPackage::new("ultimate", "Ultimate", 25, 10, 75),
    ]
}

/// Look up a catalog package by id.
pub fn find_package(id: &str) -> Option<CreditPackage> {
    credit_catalog().into_iter().find(|p| p.id == id)
}
