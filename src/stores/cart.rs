//! The shopping cart.
//!
//! The in-memory line list is the source of truth for the running session;
//! every mutation is written through to storage so the cart survives a
//! restart. Lines keep insertion order and never carry a zero quantity.

use rust_decimal::Decimal;
use std::sync::Arc;

use super::{load_or_default, remove_or_log, save_or_log, CART_KEY};
use crate::dto::{CartLine, Product};
use crate::kv::KeyValueStore;

pub struct CartStore {
    kv: Arc<dyn KeyValueStore>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Opens the cart with whatever was persisted by a previous session.
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut cart = Self {
            kv,
            lines: Vec::new(),
        };
        cart.lines = cart.load().await;
        cart
    }

    /// Reads the persisted cart. Zero-quantity lines left by older data are dropped.
    pub async fn load(&self) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = load_or_default(self.kv.as_ref(), CART_KEY).await;
        lines.retain(|line| line.quantity > 0);
        lines
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one unit of `product`, appending a new line the first time it is added.
    /// A line already at `u32::MAX` stays there.
    pub async fn add_item(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.id == product.id) {
            Some(line) if line.quantity == u32::MAX => {
                tracing::warn!(product = %product.id, "cart quantity at maximum");
                return;
            }
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::from_product(product)),
        }
        tracing::debug!(product = %product.id, "added to cart");
        self.persist().await;
    }

    pub async fn remove_item(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        if self.lines.len() != before {
            tracing::debug!(product = %id, "removed from cart");
            self.persist().await;
        }
    }

    /// Sets the quantity of a line. Zero removes the line.
    pub async fn set_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            return self.remove_item(id).await;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
            tracing::debug!(product = %id, quantity, "cart quantity changed");
            self.persist().await;
        }
    }

    /// Empties the cart and removes its key from storage.
    pub async fn clear(&mut self) {
        self.lines.clear();
        remove_or_log(self.kv.as_ref(), CART_KEY).await;
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    async fn persist(&self) {
        save_or_log(self.kv.as_ref(), CART_KEY, &self.lines).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::LocalizedText;
    use crate::kv::testing::FailingStore;
    use crate::kv::MemoryStore;
    use rust_decimal_macros::dec;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            brand: "Unilever".to_string(),
            price,
            description: LocalizedText {
                id: "Deskripsi".to_string(),
                en: "Description".to_string(),
            },
            image_url: None,
        }
    }

    async fn empty_cart() -> (Arc<MemoryStore>, CartStore) {
        let kv = Arc::new(MemoryStore::new());
        let cart = CartStore::open(kv.clone()).await;
        (kv, cart)
    }

    #[tokio::test]
    async fn test_new_cart_is_empty() {
        let (_, cart) = empty_cart().await;
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[tokio::test]
    async fn test_repeat_add_increments_single_line() {
        let (_, mut cart) = empty_cart().await;
        let p1 = product("P1", dec!(1000));
        for _ in 0..5 {
            cart.add_item(&p1).await;
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_total_and_item_count() {
        let (_, mut cart) = empty_cart().await;
        let p1 = product("P1", dec!(1000));
        let p2 = product("P2", dec!(500));
        cart.add_item(&p1).await;
        cart.add_item(&p1).await;
        cart.add_item(&p2).await;

        assert_eq!(cart.total(), dec!(2500));
        assert_eq!(cart.item_count(), 3);
    }

    #[tokio::test]
    async fn test_insertion_order_is_kept() {
        let (_, mut cart) = empty_cart().await;
        cart.add_item(&product("B", dec!(1))).await;
        cart.add_item(&product("A", dec!(1))).await;
        cart.add_item(&product("B", dec!(1))).await;

        let ids: Vec<_> = cart.lines().iter().map(|line| line.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes_line() {
        let (kv, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1000))).await;
        cart.add_item(&product("P2", dec!(500))).await;

        cart.set_quantity("P1", 0).await;
        assert!(cart.lines().iter().all(|line| line.id != "P1"));

        let reopened = CartStore::open(kv).await;
        assert_eq!(reopened.lines(), cart.lines());
    }

    #[tokio::test]
    async fn test_set_quantity_replaces() {
        let (_, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1000))).await;
        cart.set_quantity("P1", 7).await;
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total(), dec!(7000));

        // Unknown id is ignored
        cart.set_quantity("missing", 3).await;
        assert_eq!(cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_add_at_max_quantity_saturates() {
        let (kv, mut cart) = empty_cart().await;
        let p1 = product("P1", dec!(1));
        cart.add_item(&p1).await;
        cart.set_quantity("P1", u32::MAX).await;
        cart.add_item(&p1).await;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
        let reopened = CartStore::open(kv).await;
        assert_eq!(reopened.lines()[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_item_count_of_large_quantities() {
        let (_, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1))).await;
        cart.add_item(&product("P2", dec!(1))).await;
        cart.set_quantity("P1", 3_000_000_000).await;
        cart.set_quantity("P2", 3_000_000_000).await;

        assert_eq!(cart.item_count(), 6_000_000_000);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (_, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1000))).await;
        cart.add_item(&product("P2", dec!(500))).await;
        cart.remove_item("P1").await;
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].id, "P2");
    }

    #[tokio::test]
    async fn test_cart_survives_reopen() {
        let (kv, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1000))).await;
        cart.add_item(&product("P1", dec!(1000))).await;

        let reopened = CartStore::open(kv).await;
        assert_eq!(reopened.lines(), cart.lines());
        assert_eq!(reopened.total(), dec!(2000));
    }

    #[tokio::test]
    async fn test_clear_then_add() {
        let (kv, mut cart) = empty_cart().await;
        cart.add_item(&product("P1", dec!(1000))).await;
        cart.clear().await;
        assert!(cart.is_empty());
        assert_eq!(kv.get(CART_KEY).await.unwrap(), None);

        cart.add_item(&product("P2", dec!(500))).await;
        let reopened = CartStore::open(kv).await;
        assert_eq!(reopened.item_count(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_lines_are_dropped_on_load() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            CART_KEY,
            r#"[{"id":"P1","sku":"1","name":"P1","brand":"B","price":1000,"quantity":0},
                {"id":"P2","sku":"2","name":"P2","brand":"B","price":500,"quantity":2}]"#
                .to_string(),
        )
        .await
        .unwrap();

        let cart = CartStore::open(kv).await;
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), dec!(1000));
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_session_state() {
        let mut cart = CartStore::open(Arc::new(FailingStore)).await;
        assert!(cart.is_empty());

        cart.add_item(&product("P1", dec!(1000))).await;
        assert_eq!(cart.item_count(), 1);
        assert!(cart.load().await.is_empty());
    }
}
