//! Init command for Fydo.
//!
//! Scaffolds the project config file and the Fydo home directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{fydo_home, project_fydo_dir};

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Overwrite an existing config file.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    pub success: bool,
    /// Files and directories created.
    pub created: Vec<String>,
    /// Files and directories that already existed.
    pub skipped: Vec<String>,
    /// Project config file this run targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    /// Fydo home, where the counter file and crash log live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitOutput {
    pub fn success(created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: true,
            created,
            skipped,
            config_path: None,
            home: None,
            error: None,
        }
    }

    /// Failed output, keeping whatever was created before the failure.
    pub fn failure(error: impl Into<String>, created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: false,
            created,
            skipped,
            config_path: None,
            home: None,
            error: Some(error.into()),
        }
    }

    fn with_paths(mut self, config_path: &Path, home: Option<&Path>) -> Self {
        self.config_path = Some(config_path.display().to_string());
        self.home = home.map(|h| h.display().to_string());
        self
    }
}

/// Default config.toml content.
pub const DEFAULT_CONFIG: &str = r#"# Fydo configuration
#
# Environment variables (FYDO_*) override these values.

# Point the distance is measured from
[origin]
latitude = 12.9716
longitude = 77.5946

# Attempts 4 and 5 of every five out-of-range attempts show demo shops
# unless demo_fallback is false.
[gate]
radius_meters = 300.0
demo_fallback = true

# platform: "native" (10s default timeout) or "web" (15s)
# timeout_ms = 10000
[location]
platform = "native"
high_accuracy = true
maximum_age_ms = 60000

# Counter file, defaults to $FYDO_HOME/storage.json
[storage]
# path = "/var/lib/fydo/storage.json"
"#;

/// The init command implementation.
pub struct InitCommand {
    cwd: String,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(cwd: impl Into<String>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Run the init command.
    pub fn run(&self, options: &InitOptions) -> InitOutput {
        let cwd = Path::new(&self.cwd);
        let fydo_dir = project_fydo_dir(cwd);
        let config_path = fydo_dir.join("config.toml");
        let home = fydo_home();
        self.scaffold(&fydo_dir, &config_path, home.as_deref(), options.force)
            .with_paths(&config_path, home.as_deref())
    }

    fn scaffold(
        &self,
        fydo_dir: &Path,
        config_path: &Path,
        home: Option<&Path>,
        force: bool,
    ) -> InitOutput {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        match self.ensure_dir(fydo_dir) {
            Ok(true) => created.push(fydo_dir.display().to_string()),
            Ok(false) => skipped.push(fydo_dir.display().to_string()),
            Err(e) => return InitOutput::failure(e, created, skipped),
        }

        match self.ensure_file(config_path, DEFAULT_CONFIG, force) {
            Ok(true) => created.push(config_path.display().to_string()),
            Ok(false) => skipped.push(config_path.display().to_string()),
            Err(e) => return InitOutput::failure(e, created, skipped),
        }

        // Home holds the counter file and the crash log
        if let Some(home) = home {
            match self.ensure_dir(home) {
                Ok(true) => created.push(home.display().to_string()),
                Ok(false) => skipped.push(home.display().to_string()),
                Err(e) => return InitOutput::failure(e, created, skipped),
            }
        }

        InitOutput::success(created, skipped)
    }

    /// Returns Ok(true) if created, Ok(false) if it already exists.
    fn ensure_dir(&self, path: &Path) -> Result<bool, String> {
        if path.exists() {
            if path.is_dir() {
                return Ok(false);
            }
            return Err(format!("{} exists but is not a directory", path.display()));
        }

        fs::create_dir_all(path)
            .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))?;

        Ok(true)
    }

    /// Returns Ok(true) if written, Ok(false) if it already exists.
    fn ensure_file(&self, path: &Path, content: &str, force: bool) -> Result<bool, String> {
        if path.exists() && !force {
            return Ok(false);
        }

        fs::write(path, content)
            .map_err(|e| format!("Failed to write file {}: {}", path.display(), e))?;

        Ok(true)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InitOutput, options: &InitOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &InitOutput) -> String {
        let mut lines = Vec::new();

        if !output.success {
            lines.push(format!(
                "Init failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ));
            if !output.created.is_empty() {
                lines.push(format!("Left behind: {}", output.created.join(", ")));
            }
            return lines.join("\n") + "\n";
        }

        if let Some(ref config_path) = output.config_path {
            if output.created.contains(config_path) {
                lines.push(format!("Wrote default config to {}", config_path));
            } else {
                lines.push(format!(
                    "Kept existing config at {} (pass --force to reset it)",
                    config_path
                ));
            }
        }

        if let Some(ref home) = output.home {
            let state = if output.created.contains(home) {
                "created"
            } else {
                "exists"
            };
            lines.push(format!("Counter file and crash log go to {} ({})", home, state));
        }

        lines.join("\n") + "\n"
    }
}
