use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "parley.toml",
    "config/parley.toml",
    "crates/config/parley.toml",
    "../parley.toml",
    "../config/parley.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Settings that shape how the messaging repository names things.
///
/// ```
/// use parley_config::MessagingConfig;
///
/// let messaging = MessagingConfig::default();
/// assert_eq!(messaging.group_name_prefix, "Group");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    #[serde(default = "MessagingConfig::default_group_name_prefix")]
    pub group_name_prefix: String,
}

impl MessagingConfig {
    fn default_group_name_prefix() -> String {
        "Group".to_string()
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            group_name_prefix: Self::default_group_name_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "TelemetryConfig::default_filter")]
    pub filter: String,
}

impl TelemetryConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use parley_config::load;
///
/// std::env::remove_var("PARLEY_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.messaging.group_name_prefix.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default(
            "messaging.group_name_prefix",
            defaults.messaging.group_name_prefix.clone(),
        )
        .context("unable to register messaging defaults")?
        .set_default("telemetry.filter", defaults.telemetry.filter.clone())
        .context("unable to register telemetry defaults")?;

    let environment_overrides = config::Environment::with_prefix("PARLEY").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("PARLEY_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via PARLEY_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.messaging.group_name_prefix.trim().is_empty() {
        bail!("invalid configuration: messaging.group_name_prefix must not be empty");
    }

    debug!(?config, "loaded parley configuration");
    Ok(config)
}
