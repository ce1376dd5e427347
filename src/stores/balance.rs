use std::sync::Arc;

use super::{load_or_default, remove_or_log, save_or_log, BALANCE_KEY};
use crate::dto::BalanceSnapshot;
use crate::kv::KeyValueStore;

/// Holds the single most recent balance snapshot. Last write wins.
pub struct BalanceStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BalanceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn save(&self, snapshot: &BalanceSnapshot) {
        save_or_log(self.kv.as_ref(), BALANCE_KEY, snapshot).await;
    }

    pub async fn load(&self) -> Option<BalanceSnapshot> {
        load_or_default(self.kv.as_ref(), BALANCE_KEY).await
    }

    pub async fn clear(&self) {
        remove_or_log(self.kv.as_ref(), BALANCE_KEY).await;
    }
}
