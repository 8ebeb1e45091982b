//! Find command for Fydo.
//!
//! Runs one find-shops attempt and reports which screen to show.

use serde::Serialize;

use crate::config::{Config, Platform};
use crate::core::{Dismissal, FindOutcome, GateMode, ShopFinder, ShopListing, ShopView};
use crate::error::FydoError;
use crate::location::LocationProvider;
use crate::storage::CounterStore;

/// Options for the find command.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the find command.
#[derive(Debug, Clone, Serialize)]
pub struct FindOutput {
    /// Whether the attempt reached a gate decision.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<GateMode>,
    pub within_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// One-based number of this attempt within the cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ShopView>,
    pub shops: Vec<ShopListing>,
    /// Whether the counter reached durable storage.
    pub persisted: bool,
    /// Machine-readable failure kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Message to show the user on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FindOutput {
    /// Create an output from a completed attempt.
    pub fn success(outcome: FindOutcome) -> Self {
        Self {
            success: true,
            mode: Some(outcome.decision.mode),
            within_range: outcome.decision.within_range,
            distance_meters: Some(outcome.decision.distance_meters),
            attempt: Some(outcome.prior.value().saturating_add(1)),
            view: Some(outcome.view),
            shops: outcome.shops,
            persisted: outcome.persisted,
            error: None,
            message: None,
        }
    }

    /// Create an output for an attempt that never reached the gate.
    pub fn failure(error: &FydoError, platform: Platform) -> Self {
        let (kind, message) = match error {
            FydoError::Location(location) => {
                (location.kind().to_string(), location.user_message(platform))
            }
            FydoError::Dismissed => (
                "dismissed".to_string(),
                "The search was cancelled.".to_string(),
            ),
            other => (
                "internal".to_string(),
                format!("Something went wrong. Please try again. ({})", other),
            ),
        };

        Self {
            success: false,
            mode: None,
            within_range: false,
            distance_meters: None,
            attempt: None,
            view: None,
            shops: Vec::new(),
            persisted: false,
            error: Some(kind),
            message: Some(message),
        }
    }
}

/// The find command implementation.
pub struct FindCommand<S: CounterStore, L: LocationProvider> {
    finder: ShopFinder<S, L>,
    platform: Platform,
}

impl<S: CounterStore, L: LocationProvider> FindCommand<S, L> {
    /// Create a new find command.
    pub fn new(store: S, provider: L, config: &Config) -> Self {
        Self {
            finder: ShopFinder::from_config(store, provider, config),
            platform: config.location.platform,
        }
    }

    /// Run one attempt.
    pub fn run(&mut self) -> FindOutput {
        self.run_with_dismissal(&Dismissal::new())
    }

    /// Run one attempt that the caller may dismiss.
    pub fn run_with_dismissal(&mut self, dismissal: &Dismissal) -> FindOutput {
        match self.finder.find(dismissal) {
            Ok(outcome) => FindOutput::success(outcome),
            Err(e) => FindOutput::failure(&e, self.platform),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &FindOutput, options: &FindOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &FindOutput) -> String {
        if !output.success {
            return format!(
                "Location Error: {}\n",
                output.message.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();

        if let Some(view) = output.view {
            lines.push(view.headline().to_string());
        }

        if let (Some(distance), Some(attempt)) = (output.distance_meters, output.attempt) {
            lines.push(format!("Distance: {:.0} m (attempt {})", distance, attempt));
        }

        if output.view == Some(ShopView::NotOperational) {
            lines.push("Don't worry! We're expanding rapidly and hope to serve you soon.".to_string());
        }

        if !output.shops.is_empty() {
            lines.push(String::new());
            let demo = output.mode == Some(GateMode::DemoFallback);
            for shop in &output.shops {
                lines.push(format!(
                    "  {}{} - {} - {} away - rated {:.1}",
                    shop.name,
                    if demo { " [DEMO]" } else { "" },
                    shop.category,
                    shop.distance_label,
                    shop.rating
                ));
            }
        }

        if !output.persisted {
            lines.push(String::new());
            lines.push("Warning: attempt counter could not be saved.".to_string());
        }

        lines.join("\n") + "\n"
    }
}
