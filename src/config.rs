/// Runtime configuration of the `warung-order` binary.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WARUNG_STORE_PATH | warung_store.json | JSON store document to read |
/// | WARUNG_LOG | warung_order=info | Log filter, used when RUST_LOG is unset |
#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            store_path: std::env::var("WARUNG_STORE_PATH")
                .unwrap_or_else(|_| "warung_store.json".into()),
            log_filter: std::env::var("WARUNG_LOG").unwrap_or_else(|_| "warung_order=info".into()),
        }
    }

    /// Replaces the configured store path, e.g. with one given on the command line.
    pub fn with_store_path(mut self, store_path: impl Into<String>) -> Self {
        self.store_path = store_path.into();
        self
    }
}
