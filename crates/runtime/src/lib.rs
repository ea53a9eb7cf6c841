use parley_config::AppConfig;
use parley_messaging::MessagingService;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Build the filter used by the subscriber. `RUST_LOG` takes precedence
    /// over the configured directive.
    pub fn env_filter(configured: &str) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    pub fn init_tracing(configured: &str) -> Result<()> {
        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter(configured))
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// A ready-to-use messaging service built from configuration
pub struct MessagingRuntime {
    pub config: AppConfig,
    pub service: MessagingService,
}

impl MessagingRuntime {
    pub fn initialise(config: &AppConfig) -> Self {
        let service = MessagingService::new(&config.messaging);

        info!(
            group_name_prefix = %config.messaging.group_name_prefix,
            "messaging service ready"
        );

        Self {
            config: config.clone(),
            service,
        }
    }
}
