#![doc(test(attr(deny(warnings))))]

//! Finance Core tracks a main and a reserve balance through budgeting batches:
//! transactions, per-category budgets, reserve goals and the aggregations that
//! dashboards need. Persistence is JSON on disk, configuration lives in `fin-config`.

pub mod app;
pub mod errors;
pub mod utils;

pub use app::{open_store, FinanceApp};
pub use errors::{FinanceError, Result};
pub use fin_config::{Config, ConfigManager};
pub use fin_core::{format, Command, CommandOutcome, CoreError, FinanceStorage, FinanceStore, MemoryStorage};
pub use fin_domain as domain;
pub use fin_storage_json::JsonFinanceStorage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with_filter(&Config::default_log_filter());
}

/// Same as [`init`] with an explicit default filter, typically `Config::log_filter`.
pub fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        let build = utils::build_info::current();
        tracing::info!(
            build = %build.summary(),
            target = build.target,
            profile = build.profile,
            "Finance Core tracing initialized."
        );
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }

    #[test]
    fn build_info_has_version() {
        let build = super::utils::build_info::current();
        assert_eq!(build.version, env!("CARGO_PKG_VERSION"));
        assert!(build.summary().starts_with(build.version));
    }
}
