//! Configuration loading for Fydo.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.fydo/config.toml`)
//! 3. User config (`~/.fydo/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. With no config at all the gate measures
//! against the registered shop location with a 300 m radius.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::gate::{SERVICE_ORIGIN, SERVICE_RADIUS_METERS};
use crate::core::Coordinate;
use crate::error::{FydoError, Result};

/// Default location timeout on native platforms.
pub const NATIVE_TIMEOUT_MS: u64 = 10_000;

/// Default location timeout in browsers.
pub const WEB_TIMEOUT_MS: u64 = 15_000;

/// Main configuration struct for Fydo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Service origin the distance is measured against.
    pub origin: OriginConfig,
    /// Gate behavior configuration.
    pub gate: GateConfig,
    /// Location provider configuration.
    pub location: LocationConfig,
    /// Counter storage configuration.
    pub storage: StorageConfig,
}

/// Service origin configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OriginConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl OriginConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            latitude: SERVICE_ORIGIN.latitude,
            longitude: SERVICE_ORIGIN.longitude,
        }
    }
}

/// Gate behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Distance (in meters) up to which a location counts as in range.
    pub radius_meters: f64,
    /// Whether attempts 4 and 5 of a cycle fall back to placeholder shops.
    pub demo_fallback: bool,
}

impl GateConfig {
    /// Check if a radius is usable (finite and non-negative).
    pub fn is_valid_radius(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            radius_meters: SERVICE_RADIUS_METERS,
            demo_fallback: true,
        }
    }
}

/// Which platform the location provider runs on.
///
/// Affects the default timeout and the wording of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Native,
    Web,
}

/// Valid values for the platform field.
pub const VALID_PLATFORMS: &[&str] = &["native", "web"];

impl Platform {
    /// Parse a platform name (`native` or `web`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" => Some(Platform::Native),
            "web" => Some(Platform::Web),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native => "native",
            Platform::Web => "web",
        }
    }

    /// How long to wait for a fix when no timeout is configured.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Platform::Native => Duration::from_millis(NATIVE_TIMEOUT_MS),
            Platform::Web => Duration::from_millis(WEB_TIMEOUT_MS),
        }
    }
}

/// Location provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationConfig {
    pub platform: Platform,
    /// Explicit acquisition timeout. Falls back to the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Request a high-accuracy fix.
    pub high_accuracy: bool,
    /// Maximum age of a cached fix the provider may return.
    pub maximum_age_ms: u64,
}

impl LocationConfig {
    /// Timeout to hand to the provider.
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.platform.default_timeout())
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Native,
            timeout_ms: None,
            high_accuracy: true,
            maximum_age_ms: 60_000,
        }
    }
}

/// Counter storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the counter file. Defaults to `<fydo_home>/storage.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the counter file path.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_storage_path)
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.fydo/config.toml` in cwd or an ancestor)
    /// 3. User config (`~/.fydo/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.fydo/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = fydo_home()?;
        let config_path = home.join("config.toml");
        Self::load_optional(&config_path)
    }

    /// Load project config from `.fydo/config.toml`.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let config_path = project_fydo_dir(cwd).join("config.toml");
        Self::load_optional(&config_path)
    }

    /// Load a config file if it exists, warning when it does not parse.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| FydoError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| FydoError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // FYDO_ORIGIN_LAT
        if let Ok(val) = env::var("FYDO_ORIGIN_LAT") {
            match val.parse::<f64>() {
                Ok(lat) if lat.is_finite() && (-90.0..=90.0).contains(&lat) => {
                    self.origin.latitude = lat;
                }
                _ => eprintln!(
                    "Warning: Invalid FYDO_ORIGIN_LAT value '{}'. \
                    Expected a latitude in [-90, 90]. Using '{}'.",
                    val, self.origin.latitude
                ),
            }
        }

        // FYDO_ORIGIN_LON
        if let Ok(val) = env::var("FYDO_ORIGIN_LON") {
            match val.parse::<f64>() {
                Ok(lon) if lon.is_finite() && (-180.0..=180.0).contains(&lon) => {
                    self.origin.longitude = lon;
                }
                _ => eprintln!(
                    "Warning: Invalid FYDO_ORIGIN_LON value '{}'. \
                    Expected a longitude in [-180, 180]. Using '{}'.",
                    val, self.origin.longitude
                ),
            }
        }

        // FYDO_RADIUS_METERS
        if let Ok(val) = env::var("FYDO_RADIUS_METERS") {
            match val.parse::<f64>() {
                Ok(r) if GateConfig::is_valid_radius(r) => self.gate.radius_meters = r,
                _ => eprintln!(
                    "Warning: Invalid FYDO_RADIUS_METERS value '{}'. \
                    Expected a non-negative number. Using '{}'.",
                    val, self.gate.radius_meters
                ),
            }
        }

        // FYDO_DEMO_FALLBACK
        if let Ok(val) = env::var("FYDO_DEMO_FALLBACK") {
            match parse_bool(&val) {
                Some(enabled) => self.gate.demo_fallback = enabled,
                None => eprintln!(
                    "Warning: Invalid FYDO_DEMO_FALLBACK value '{}'. \
                    Expected true/false or 1/0. Using '{}'.",
                    val, self.gate.demo_fallback
                ),
            }
        }

        // FYDO_PLATFORM
        if let Ok(val) = env::var("FYDO_PLATFORM") {
            match Platform::parse(&val) {
                Some(platform) => self.location.platform = platform,
                None => eprintln!(
                    "Warning: Invalid FYDO_PLATFORM value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val,
                    VALID_PLATFORMS,
                    self.location.platform.as_str()
                ),
            }
        }

        // FYDO_LOCATION_TIMEOUT_MS
        if let Ok(val) = env::var("FYDO_LOCATION_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms > 0 => self.location.timeout_ms = Some(ms),
                _ => eprintln!(
                    "Warning: Invalid FYDO_LOCATION_TIMEOUT_MS value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val,
                    self.location.timeout().as_millis()
                ),
            }
        }

        // FYDO_STORAGE_PATH
        if let Ok(val) = env::var("FYDO_STORAGE_PATH") {
            if val.is_empty() {
                tracing::warn!("FYDO_STORAGE_PATH is empty, ignoring");
            } else {
                self.storage.path = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values in `other` that differ from the defaults win. As with any
    /// default-comparison merge, a later layer cannot set a value back to its
    /// default once an earlier layer changed it.
    fn merge(mut self, other: Config) -> Self {
        let default_origin = OriginConfig::default();
        if other.origin.latitude != default_origin.latitude {
            self.origin.latitude = other.origin.latitude;
        }
        if other.origin.longitude != default_origin.longitude {
            self.origin.longitude = other.origin.longitude;
        }

        let default_gate = GateConfig::default();
        if other.gate.radius_meters != default_gate.radius_meters {
            self.gate.radius_meters = other.gate.radius_meters;
        }
        if other.gate.demo_fallback != default_gate.demo_fallback {
            self.gate.demo_fallback = other.gate.demo_fallback;
        }

        let default_location = LocationConfig::default();
        if other.location.platform != default_location.platform {
            self.location.platform = other.location.platform;
        }
        if other.location.timeout_ms.is_some() {
            self.location.timeout_ms = other.location.timeout_ms;
        }
        if other.location.high_accuracy != default_location.high_accuracy {
            self.location.high_accuracy = other.location.high_accuracy;
        }
        if other.location.maximum_age_ms != default_location.maximum_age_ms {
            self.location.maximum_age_ms = other.location.maximum_age_ms;
        }

        if other.storage.path.is_some() {
            self.storage.path = other.storage.path;
        }

        self
    }

    /// Check values that file layers may have set out of range.
    pub fn validate(&self) -> Result<()> {
        if !self.origin.coordinate().is_valid() {
            return Err(FydoError::config(format!(
                "origin ({}) is not a valid coordinate",
                self.origin.coordinate()
            )));
        }
        if !GateConfig::is_valid_radius(self.gate.radius_meters) {
            return Err(FydoError::config(format!(
                "gate.radius_meters must be a non-negative number, got {}",
                self.gate.radius_meters
            )));
        }
        if self.location.timeout_ms == Some(0) {
            return Err(FydoError::config("location.timeout_ms must be positive"));
        }
        Ok(())
    }
}

/// Parse a boolean env value: `true`/`false` (any case) or `1`/`0`.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Get the Fydo home directory.
///
/// Checks `FYDO_HOME` first, then falls back to `~/.fydo`. An empty
/// `FYDO_HOME` is ignored.
pub fn fydo_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("FYDO_HOME") {
        if home.is_empty() {
            tracing::warn!("FYDO_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("FYDO_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".fydo"));
    }

    let fallback_path = env::temp_dir().join("fydo");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Default counter file: `<fydo_home>/storage.json`.
pub fn default_storage_path() -> Option<PathBuf> {
    fydo_home().map(|h| h.join("storage.json"))
}

/// Crash log written by the panic hook: `<fydo_home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    fydo_home().map(|h| h.join("crash.log"))
}

/// Find the `.fydo/` directory for a working directory.
///
/// Walks up from `cwd` to the nearest ancestor holding a `.fydo/` directory
/// and falls back to `cwd/.fydo`.
pub fn project_fydo_dir(cwd: &Path) -> PathBuf {
    for ancestor in cwd.ancestors() {
        let candidate = ancestor.join(".fydo");
        if candidate.is_dir() {
            return candidate;
        }
    }
    cwd.join(".fydo")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "FYDO_ORIGIN_LAT",
        "FYDO_ORIGIN_LON",
        "FYDO_RADIUS_METERS",
        "FYDO_DEMO_FALLBACK",
        "FYDO_PLATFORM",
        "FYDO_LOCATION_TIMEOUT_MS",
        "FYDO_STORAGE_PATH",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    /// Point FYDO_HOME at an empty directory so the user layer is absent.
    fn isolated_home() -> TempDir {
        let home = TempDir::new().unwrap();
        env::set_var("FYDO_HOME", home.path());
        home
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.origin.coordinate(), SERVICE_ORIGIN);
        assert_eq!(config.gate.radius_meters, 300.0);
        assert!(config.gate.demo_fallback);
        assert_eq!(config.location.platform, Platform::Native);
        assert_eq!(config.location.timeout_ms, None);
        assert!(config.location.high_accuracy);
        assert_eq!(config.location.maximum_age_ms, 60_000);
        assert_eq!(config.storage.path, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_platform_timeouts() {
        let mut location = LocationConfig::default();
        assert_eq!(location.timeout(), Duration::from_secs(10));

        location.platform = Platform::Web;
        assert_eq!(location.timeout(), Duration::from_secs(15));

        location.timeout_ms = Some(2_500);
        assert_eq!(location.timeout(), Duration::from_millis(2_500));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("web"), Some(Platform::Web));
        assert_eq!(Platform::parse(" Native "), Some(Platform::Native));
        assert_eq!(Platform::parse("ios"), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let toml_content = r#"
[gate]
radius_meters = 500.0
demo_fallback = false

[location]
platform = "web"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();

        assert_eq!(config.gate.radius_meters, 500.0);
        assert!(!config.gate.demo_fallback);
        assert_eq!(config.location.platform, Platform::Web);

        // Other fields should be defaults
        assert_eq!(config.origin, OriginConfig::default());
        assert!(config.location.high_accuracy);
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(FydoError::Storage { .. })));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = Config::load_from_file(&config_path);
        assert!(matches!(result, Err(FydoError::Config { .. })));
    }

    #[test]
    #[serial]
    fn test_project_config_precedence() {
        clear_env();
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        let fydo_dir = dir.path().join(".fydo");
        fs::create_dir_all(&fydo_dir).unwrap();

        fs::write(
            fydo_dir.join("config.toml"),
            "[origin]\nlatitude = 48.8566\nlongitude = 2.3522\n",
        )
        .unwrap();

        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.origin.coordinate(), Coordinate::new(48.8566, 2.3522));
        assert_eq!(config.gate.radius_meters, 300.0);

        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_project_config_found_from_subdirectory() {
        clear_env();
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        let fydo_dir = dir.path().join(".fydo");
        fs::create_dir_all(&fydo_dir).unwrap();
        fs::write(fydo_dir.join("config.toml"), "[gate]\nradius_meters = 750.0\n").unwrap();

        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::load_from_cwd(&nested);
        assert_eq!(config.gate.radius_meters, 750.0);

        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_user_then_project_layering() {
        clear_env();
        let home = isolated_home();
        fs::write(
            home.path().join("config.toml"),
            "[gate]\ndemo_fallback = false\n\n[location]\nplatform = \"web\"\n",
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let fydo_dir = dir.path().join(".fydo");
        fs::create_dir_all(&fydo_dir).unwrap();
        fs::write(fydo_dir.join("config.toml"), "[location]\ntimeout_ms = 4000\n").unwrap();

        let config = Config::load_from_cwd(dir.path());

        // From user config
        assert!(!config.gate.demo_fallback);
        assert_eq!(config.location.platform, Platform::Web);
        // From project config
        assert_eq!(config.location.timeout_ms, Some(4_000));

        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_env_var_precedence() {
        clear_env();
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();
        let fydo_dir = dir.path().join(".fydo");
        fs::create_dir_all(&fydo_dir).unwrap();
        fs::write(fydo_dir.join("config.toml"), "[gate]\nradius_meters = 750.0\n").unwrap();

        env::set_var("FYDO_RADIUS_METERS", "120");

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config.gate.radius_meters, 120.0);

        clear_env();
        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        clear_env();
        let _home = isolated_home();
        env::set_var("FYDO_ORIGIN_LAT", "51.5072");
        env::set_var("FYDO_ORIGIN_LON", "-0.1276");
        env::set_var("FYDO_DEMO_FALLBACK", "false");
        env::set_var("FYDO_PLATFORM", "web");
        env::set_var("FYDO_LOCATION_TIMEOUT_MS", "3000");
        env::set_var("FYDO_STORAGE_PATH", "/tmp/fydo-test/storage.json");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.origin.coordinate(), Coordinate::new(51.5072, -0.1276));
        assert!(!config.gate.demo_fallback);
        assert_eq!(config.location.platform, Platform::Web);
        assert_eq!(config.location.timeout(), Duration::from_millis(3_000));
        assert_eq!(
            config.storage.resolve_path(),
            Some(PathBuf::from("/tmp/fydo-test/storage.json"))
        );

        clear_env();
        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_values_ignored() {
        clear_env();
        let _home = isolated_home();
        env::set_var("FYDO_ORIGIN_LAT", "95");
        env::set_var("FYDO_RADIUS_METERS", "-5");
        env::set_var("FYDO_PLATFORM", "ios");
        env::set_var("FYDO_LOCATION_TIMEOUT_MS", "soon");
        env::set_var("FYDO_DEMO_FALLBACK", "yes");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_cwd(dir.path());

        assert_eq!(config.origin, OriginConfig::default());
        assert_eq!(config.gate.radius_meters, 300.0);
        assert!(config.gate.demo_fallback);
        assert_eq!(config.location.platform, Platform::Native);
        assert_eq!(config.location.timeout_ms, None);

        clear_env();
        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_env_demo_fallback_accepts_any_case() {
        clear_env();
        let _home = isolated_home();
        let dir = TempDir::new().unwrap();

        env::set_var("FYDO_DEMO_FALLBACK", "FALSE");
        assert!(!Config::load_from_cwd(dir.path()).gate.demo_fallback);

        env::set_var("FYDO_DEMO_FALLBACK", "0");
        assert!(!Config::load_from_cwd(dir.path()).gate.demo_fallback);

        env::set_var("FYDO_DEMO_FALLBACK", " True ");
        assert!(Config::load_from_cwd(dir.path()).gate.demo_fallback);

        clear_env();
        env::remove_var("FYDO_HOME");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("on"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_merge_keeps_earlier_customizations() {
        let mut base = Config::default();
        base.gate.radius_meters = 450.0;
        base.storage.path = Some(PathBuf::from("/a/storage.json"));

        let mut other = Config::default();
        other.location.platform = Platform::Web;

        let merged = base.merge(other);
        assert_eq!(merged.gate.radius_meters, 450.0);
        assert_eq!(merged.location.platform, Platform::Web);
        assert_eq!(merged.storage.path, Some(PathBuf::from("/a/storage.json")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.origin.latitude = 123.0;
        assert!(matches!(config.validate(), Err(FydoError::Config { .. })));

        let mut config = Config::default();
        config.gate.radius_meters = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.location.timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_fydo_home_with_env() {
        let dir = TempDir::new().unwrap();
        env::set_var("FYDO_HOME", dir.path());

        assert_eq!(fydo_home(), Some(dir.path().to_path_buf()));
        assert_eq!(
            default_storage_path(),
            Some(dir.path().join("storage.json"))
        );
        assert_eq!(crash_log_path(), Some(dir.path().join("crash.log")));

        env::remove_var("FYDO_HOME");
    }

    #[test]
    #[serial]
    fn test_fydo_home_empty_env() {
        env::set_var("FYDO_HOME", "");
        let home = fydo_home().unwrap();
        assert!(home.ends_with(".fydo") || home.ends_with("fydo"));
        env::remove_var("FYDO_HOME");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[gate]\ndemo_fallback = false\n").unwrap();
        assert!(!config.gate.demo_fallback);
        assert_eq!(config.gate.radius_meters, 300.0);
        assert_eq!(config.origin, OriginConfig::default());
    }
}
