//! Shop listings and routing of gate decisions to views.

use serde::{Deserialize, Serialize};

use crate::core::gate::{GateDecision, GateMode};

/// One shop as shown in the nearby-shops list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopListing {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Human-readable distance, e.g. "150m" or "1.2 km".
    pub distance_label: String,
    pub rating: f32,
}

impl ShopListing {
    fn new(id: &str, name: &str, category: &str, distance_label: &str, rating: f32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            distance_label: distance_label.to_string(),
            rating,
        }
    }
}

/// Shops around the service origin.
pub fn real_shops() -> Vec<ShopListing> {
    vec![
        ShopListing::new("1", "Green Grocery Store", "Groceries", "150m", 4.5),
        ShopListing::new("2", "Fresh Bakery", "Bakery", "220m", 4.8),
        ShopListing::new("3", "Tech Repair Hub", "Electronics", "280m", 4.3),
        ShopListing::new("4", "Fashion Boutique", "Clothing", "295m", 4.6),
    ]
}

/// Placeholder shops shown in demo mode.
pub fn demo_shops() -> Vec<ShopListing> {
    vec![
        ShopListing::new("1", "Fydo Test Store 1", "Demo Store", "1.2 km", 4.2),
        ShopListing::new("2", "Fydo Test Store 2", "Test Shop", "2.5 km", 4.0),
        ShopListing::new("3", "Demo Mart", "Sample Store", "3.1 km", 3.8),
        ShopListing::new("4", "Mock Retail", "Mock Shop", "0.9 km", 4.5),
    ]
}

/// Screen the presentation layer should route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ShopView {
    /// The shop list, with real or placeholder data.
    NearbyShops { demo: bool },
    /// The "not operational in your area" screen.
    NotOperational,
}

impl ShopView {
    pub fn for_mode(mode: GateMode) -> Self {
        match mode {
            GateMode::Serviceable => ShopView::NearbyShops { demo: false },
            GateMode::DemoFallback => ShopView::NearbyShops { demo: true },
            GateMode::NotServiceable => ShopView::NotOperational,
        }
    }

    pub fn for_decision(decision: &GateDecision) -> Self {
        Self::for_mode(decision.mode)
    }

    /// Shops to list on this view.
    pub fn shops(&self) -> Vec<ShopListing> {
        match self {
            ShopView::NearbyShops { demo: false } => real_shops(),
            ShopView::NearbyShops { demo: true } => demo_shops(),
            ShopView::NotOperational => Vec::new(),
        }
    }

    /// Headline shown above the content.
    pub fn headline(&self) -> &'static str {
        match self {
            ShopView::NearbyShops { demo: false } => "Great! We found shops near you",
            ShopView::NearbyShops { demo: true } => "Demo Mode - Sample Stores for Testing",
            ShopView::NotOperational => "Oops! We are not operational in your area",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_have_four_shops() {
        assert_eq!(real_shops().len(), 4);
        assert_eq!(demo_shops().len(), 4);
    }

    #[test]
    fn test_real_shops_are_within_radius_labels() {
        for shop in real_shops() {
            assert!(shop.distance_label.ends_with('m'));
            assert!(!shop.distance_label.contains("km"));
        }
    }

    #[test]
    fn test_view_for_mode() {
        assert_eq!(
            ShopView::for_mode(GateMode::Serviceable),
            ShopView::NearbyShops { demo: false }
        );
        assert_eq!(
            ShopView::for_mode(GateMode::DemoFallback),
            ShopView::NearbyShops { demo: true }
        );
        assert_eq!(
            ShopView::for_mode(GateMode::NotServiceable),
            ShopView::NotOperational
        );
    }

    #[test]
    fn test_view_shops() {
        let real = ShopView::NearbyShops { demo: false }.shops();
        assert_eq!(real[0].name, "Green Grocery Store");

        let demo = ShopView::NearbyShops { demo: true }.shops();
        assert_eq!(demo[2].name, "Demo Mart");

        assert!(ShopView::NotOperational.shops().is_empty());
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let json = serde_json::to_value(ShopView::NearbyShops { demo: true }).unwrap();
        assert_eq!(json["view"], "nearby_shops");
        assert_eq!(json["demo"], true);

        let json = serde_json::to_value(ShopView::NotOperational).unwrap();
        assert_eq!(json["view"], "not_operational");
    }
}
