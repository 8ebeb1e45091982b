//! Shops command for Fydo.
//!
//! Prints one of the fixed shop catalogs.

use serde::Serialize;

use crate::core::{ShopListing, ShopView};

/// Options for the shops command.
#[derive(Debug, Clone, Default)]
pub struct ShopsOptions {
    /// Show the placeholder catalog instead of the real one.
    pub demo: bool,
    /// Output as JSON.
    pub json: bool,
}

/// Output format for the shops command.
#[derive(Debug, Clone, Serialize)]
pub struct ShopsOutput {
    pub demo: bool,
    pub shops: Vec<ShopListing>,
}

/// The shops command implementation.
#[derive(Debug, Default)]
pub struct ShopsCommand;

impl ShopsCommand {
    pub fn new() -> Self {
        Self
    }

    /// List the catalog selected by `options`.
    pub fn run(&self, options: &ShopsOptions) -> ShopsOutput {
        let view = ShopView::NearbyShops { demo: options.demo };
        ShopsOutput {
            demo: options.demo,
            shops: view.shops(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ShopsOutput, options: &ShopsOptions) -> String {
        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "[]".to_string());
        }

        let mut out = String::new();
        if output.demo {
            out.push_str("Demo catalog\n");
        }
        for shop in &output.shops {
            out.push_str(&format!(
                "{:<4} {:<22} {:<12} {:>6}  {:.1}\n",
                shop.id, shop.name, shop.category, shop.distance_label, shop.rating
            ));
        }
        out
    }
}
