use filegate_core::{FileError, FileResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `filegate=debug` filter. Fails if a
/// subscriber is already installed.
pub fn init_telemetry(json: bool) -> FileResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "filegate=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    result.map_err(|e| FileError::Configuration(format!("Failed to initialize tracing: {}", e)))?;

    tracing::debug!(json, "Tracing initialized");
    Ok(())
}
