pub mod build_info;

use std::{path::PathBuf, sync::Once};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Base directory for config and data, honouring `FINANCE_CORE_HOME`.
pub fn app_data_dir() -> PathBuf {
    fin_config::default_base_dir()
}
