//! Payment collection history, most-recent-first, upserted by collection id.

use std::sync::Arc;

use super::record_log::{Placement, Record, RecordLog};
use super::PAYMENT_COLLECTIONS_KEY;
use crate::dto::{CollectionStatus, PaymentCollection};
use crate::kv::KeyValueStore;
use crate::Error;

impl Record for PaymentCollection {
    fn record_id(&self) -> &str {
        &self.id
    }
}

pub struct PaymentCollectionStore {
    log: RecordLog<PaymentCollection>,
}

impl PaymentCollectionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: RecordLog::new(kv, PAYMENT_COLLECTIONS_KEY),
        }
    }

    pub async fn save(&self, collection: PaymentCollection) -> Placement {
        self.log.save(collection).await
    }

    pub async fn load(&self) -> Vec<PaymentCollection> {
        self.log.load().await
    }

    pub async fn find(&self, id: &str) -> Option<PaymentCollection> {
        self.log.find(id).await
    }

    /// Corrects the status of a stored collection without moving it.
    pub async fn set_status(
        &self,
        id: &str,
        status: CollectionStatus,
    ) -> Result<PaymentCollection, Error> {
        self.log
            .update(id, |collection| {
                let changed = collection.status != status;
                collection.status = status;
                Ok::<bool, Error>(changed)
            })
            .await?
            .map(|(collection, _)| collection)
            .ok_or_else(|| Error::PaymentCollectionNotFound(id.to_owned()))
    }

    pub async fn clear(&self) {
        self.log.clear().await
    }
}
