use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,mongodb=warn"
    } else {
        "debug,hyper=info,mongodb=info,tower_http=debug"
    }
}

/// Install the color-eyre report hook.
///
/// Reports show where the error was raised and leave the environment section
/// out. Call before anything fallible in `main`; repeat calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Install the global subscriber.
///
/// Production (`APP_ENV=production`) logs flattened JSON events, one per line;
/// development logs pretty multi-line events. Both carry a
/// `tracing_error::ErrorLayer` so eyre reports include the active spans.
/// `RUST_LOG` replaces [`default_filter`].
///
/// A second call leaves the first subscriber in place.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let production = environment.is_production();
    let json = production.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
    });
    let pretty = (!production).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .pretty()
    });

    let installed = tracing_subscriber::registry()
        .with(json)
        .with(pretty)
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();

    match installed {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}
