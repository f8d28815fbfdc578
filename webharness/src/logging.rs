use tracing_subscriber::EnvFilter;

/// Handle over the installed tracing subscriber.
///
/// Constructed explicitly by the caller and passed where logging
/// configuration is needed. There is no global accessor besides the
/// subscriber itself; holding the handle tells you init already ran.
#[derive(Clone, Debug)]
pub struct LogHandle {
    filter: String,
}

impl LogHandle {
    /// Install the global subscriber, honoring `RUST_LOG` when set and
    /// falling back to `default_filter` otherwise. Panics if a
    /// subscriber is already installed.
    pub fn init(default_filter: &str) -> Self {
        let filter = resolved_filter(default_filter);
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
        Self { filter }
    }

    /// Like [`LogHandle::init`] but tolerates an already-installed
    /// subscriber. Used by tests that share a process.
    pub fn try_init(default_filter: &str) -> Self {
        let filter = resolved_filter(default_filter);
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init();
        Self { filter }
    }

    /// The directive string this handle was built with.
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

fn resolved_filter(default_filter: &str) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_filter.to_string())
}
