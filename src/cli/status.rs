//! Status command for Fydo.
//!
//! Shows the persisted retry counter and what the next attempt will do.

use serde::Serialize;

use crate::config::Config;
use crate::core::{AttemptCounter, NextStep, RetryCycleLocationGate, RETRY_COUNTER_KEY};
use crate::error::FailOpen;
use crate::storage::CounterStore;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Persisted counter value, zero when absent or unreadable.
    pub counter: u32,
    pub in_cycle: bool,
    /// One-based number of the next attempt.
    pub next_attempt: u32,
    pub next_step: NextStep,
    pub origin: String,
    pub radius_meters: f64,
    pub demo_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

/// The status command implementation.
pub struct StatusCommand<S: CounterStore> {
    store: S,
    gate: RetryCycleLocationGate,
    storage_path: Option<String>,
}

impl<S: CounterStore> StatusCommand<S> {
    /// Create a new status command.
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            gate: RetryCycleLocationGate::from_config(config),
            storage_path: config
                .storage
                .resolve_path()
                .map(|p| p.display().to_string()),
        }
    }

    /// Run the status command.
    pub fn run(&self) -> StatusOutput {
        let value = self
            .store
            .read_or_zero(RETRY_COUNTER_KEY)
            .fail_open_default("reading retry counter");
        let counter = AttemptCounter::new(value);
        let preview = self.gate.preview(counter);

        StatusOutput {
            counter: value,
            in_cycle: counter.is_in_cycle(),
            next_attempt: preview.attempt,
            next_step: preview.next,
            origin: self.gate.origin().to_string(),
            radius_meters: self.gate.radius_meters(),
            demo_fallback: self.gate.demo_fallback(),
            storage_path: self.storage_path.clone(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let mut lines = vec![
            format!("Attempt: {}", output.next_attempt),
            format!("Next: {}", output.next_step.describe()),
            format!(
                "Service area: {:.0} m around {}",
                output.radius_meters, output.origin
            ),
        ];

        if !output.in_cycle {
            lines.push(format!(
                "Stored counter {} is outside the cycle and resets on the next miss",
                output.counter
            ));
        }
        if !output.demo_fallback {
            lines.push("Demo fallback: disabled".to_string());
        }
        if let Some(ref path) = output.storage_path {
            lines.push(format!("Storage: {}", path));
        }

        lines.join("\n") + "\n"
    }
}
