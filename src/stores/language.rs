use std::sync::Arc;

use super::{remove_or_log, LANGUAGE_KEY};
use crate::dto::Language;
use crate::kv::KeyValueStore;

/// Persists the display language as its bare code (`id` / `en`), not as JSON.
pub struct LanguageStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LanguageStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn save(&self, language: Language) {
        if let Err(e) = self.kv.set(LANGUAGE_KEY, language.code().to_owned()).await {
            tracing::error!(key = LANGUAGE_KEY, error = %e, "failed to save language preference");
        }
    }

    /// The stored language, or [`Language::default`] when nothing valid is stored.
    pub async fn load(&self) -> Language {
        match self.kv.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                tracing::warn!(%code, "unrecognized language code, using default");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::error!(key = LANGUAGE_KEY, error = %e, "failed to load language preference");
                Language::default()
            }
        }
    }

    pub async fn clear(&self) {
        remove_or_log(self.kv.as_ref(), LANGUAGE_KEY).await;
    }
}
