use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Installs the stderr subscriber once.
///
/// `MEGASENA_LOG` takes the usual filter directives, e.g.
/// `MEGASENA_LOG=megasena_db=debug,megasena_analysis=info`. Falls back to
/// `megasena=info`, which covers all three crates.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("MEGASENA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("megasena=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
