//! Subscriber installation.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{LogFormat, ObservabilityConfig, ObservabilityError};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. May be called once per
/// process; later calls return [`ObservabilityError::AlreadyInitialized`].
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(ObservabilityError::AlreadyInitialized);
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            INITIALIZED.store(false, Ordering::SeqCst);
            ObservabilityError::Config(format!("invalid log level '{}': {e}", config.level))
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    // A subscriber installed by someone else still counts as initialized.
    installed.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Initialized structured tracing"
    );
    Ok(())
}

/// Whether [`init_tracing`] has been called in this process.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
