use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Order, OrderCollection};
use crate::repositories::collection_lock::{CollectionGuard, CollectionLock, LockedCollection};
use crate::repositories::json_document::{DocumentState, JsonDocument, LoadedDocument};
use crate::utils::errors::AppResult;

impl LockedCollection for OrderCollection {
    const NAME: &'static str = "orders";
}

/// Pedidos respaldados por `orders.json`
#[derive(Debug, Clone)]
pub struct OrderRepository {
    document: JsonDocument<OrderCollection>,
    lock: CollectionLock<OrderCollection>,
}

impl OrderRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: JsonDocument::new(path),
            lock: CollectionLock::new(),
        }
    }

    pub fn document(&self) -> &JsonDocument<OrderCollection> {
        &self.document
    }

    pub async fn lock(&self, wait: Duration) -> AppResult<CollectionGuard<OrderCollection>> {
        self.lock.acquire(wait).await
    }

    pub fn verify_guard(&self, guard: &CollectionGuard<OrderCollection>) -> AppResult<()> {
        self.lock.verify(guard)
    }

    pub async fn load_collection(&self) -> AppResult<LoadedDocument<OrderCollection>> {
        let loaded = self.document.load().await?;
        let skipped = loaded.value.unparsed_count();
        if skipped > 0 {
            log::warn!(
                "⚠️ {} pedidos de {} no tienen el formato esperado; se conservan sin cambios",
                skipped,
                self.document.path().display()
            );
        }
        Ok(loaded)
    }

    pub async fn load_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.load_collection().await?.value.orders().cloned().collect())
    }

    pub async fn find_by_id(&self, order_id: &str) -> AppResult<Option<Order>> {
        let collection = self.load_collection().await?.value;
        Ok(collection.find_by_id(order_id).cloned())
    }

    /// Guardar un pedido nuevo y reescribir la colección. Exige el lock de esta colección.
    ///
    /// Si el fichero existente estaba corrupto se guarda una copia y la
    /// colección se reinicia con solo este pedido.
    pub async fn append_order(
        &self,
        guard: &CollectionGuard<OrderCollection>,
        order: Order,
    ) -> AppResult<()> {
        self.verify_guard(guard)?;

        let loaded = self.load_collection().await?;
        if loaded.state == DocumentState::Corrupt {
            self.document.backup_corrupt().await?;
        }

        let mut collection = loaded.value;
        let order_id = order.order_id.clone();
        collection.add(order);
        self.document.write(&collection).await?;

        log::info!("🧾 Pedido {} guardado ({} en total)", order_id, collection.len());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{CarSnapshot, CustomerSnapshot, OrderStatus, RentalSnapshot};
    use chrono::NaiveDate;

    pub(crate) fn sample_order(order_id: &str) -> Order {
        Order {
            order_id: order_id.to_string(),
            customer: CustomerSnapshot {
                name: "Jane Doe".to_string(),
                phone_number: "555-0100".to_string(),
                email: "jane@example.com".to_string(),
                drivers_license_number: "D1234567".to_string(),
            },
            car: CarSnapshot {
                vin: "V1".to_string(),
                brand: "Hyundai".to_string(),
                car_model: "Avante".to_string(),
                price_per_day: Some(50.0),
            },
            rental: RentalSnapshot {
                start_date: "2030-01-01".to_string(),
                rental_period: 3,
                order_date: NaiveDate::from_ymd_opt(2029, 12, 20)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
                total_price: 150.0,
            },
            status: Some(OrderStatus::Confirmed),
        }
    }

    #[tokio::test]
    async fn test_missing_and_empty_orders_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        assert!(repository.load_orders().await.unwrap().is_empty());

        std::fs::write(repository.document().path(), "").unwrap();
        assert!(repository.load_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_exact_id() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let collection = OrderCollection::from(vec![sample_order("b"), sample_order("a")]);
        repository.document().write(&collection).await.unwrap();

        let orders = repository.load_orders().await.unwrap();
        assert_eq!(
            orders.iter().map(|o| o.order_id.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert_eq!(repository.find_by_id("b").await.unwrap(), Some(sample_order("b")));
        assert!(repository.find_by_id("B").await.unwrap().is_none());
        assert!(repository.find_by_id(" b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let guard = repository.lock(Duration::ZERO).await.unwrap();
        assert!(repository.lock(Duration::ZERO).await.is_err());
        drop(guard);
        assert!(repository.lock(Duration::ZERO).await.is_ok());
    }

    fn backups_in(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .count()
    }

    #[tokio::test]
    async fn test_append_to_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let guard = repository.lock(Duration::ZERO).await.unwrap();

        repository.append_order(&guard, sample_order("first")).await.unwrap();
        assert_eq!(repository.load_orders().await.unwrap(), vec![sample_order("first")]);

        std::fs::write(repository.document().path(), "   ").unwrap();
        repository.append_order(&guard, sample_order("second")).await.unwrap();
        assert_eq!(repository.load_orders().await.unwrap(), vec![sample_order("second")]);
        assert_eq!(backups_in(&dir), 0);
    }

    #[tokio::test]
    async fn test_append_puts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let guard = repository.lock(Duration::ZERO).await.unwrap();

        repository.append_order(&guard, sample_order("a")).await.unwrap();
        repository.append_order(&guard, sample_order("b")).await.unwrap();

        let ids: Vec<_> = repository
            .load_orders()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_append_reinitializes_corrupt_file_after_backup() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        std::fs::write(repository.document().path(), "{\"orders\": [oops").unwrap();
        let guard = repository.lock(Duration::ZERO).await.unwrap();

        repository.append_order(&guard, sample_order("fresh")).await.unwrap();

        assert_eq!(repository.load_orders().await.unwrap(), vec![sample_order("fresh")]);
        assert_eq!(backups_in(&dir), 1);
    }

    #[tokio::test]
    async fn test_append_keeps_orders_in_the_old_format() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let current = serde_json::to_value(sample_order("snapcar_good")).unwrap();
        let old_form = serde_json::json!({
            "orderId": "ord_1717000000000abcde",
            "customer": {
                "name": "Lee",
                "phoneNumber": "010-0000-0000",
                "email": "lee@example.com",
                "driversLicense": "12-34-567890-12"
            },
            "car": { "vin": "V2", "brand": "Kia", "carModel": "K5", "pricePerDay": 60 },
            "rental": {
                "startDate": "2024-06-01",
                "rentalPeriod": 2,
                "orderDate": "2024-05-30T14:05:09.123Z",
                "totalPrice": 120
            },
            "status": "pending"
        });
        let unreadable = serde_json::json!({ "orderId": "ord_nan", "rental": { "totalPrice": null } });
        std::fs::write(
            repository.document().path(),
            serde_json::json!({ "orders": [current, old_form.clone(), unreadable.clone()] }).to_string(),
        )
        .unwrap();

        assert_eq!(repository.load_orders().await.unwrap().len(), 2);
        assert!(repository.find_by_id("snapcar_good").await.unwrap().is_some());
        assert!(repository.find_by_id("ord_1717000000000abcde").await.unwrap().is_some());

        let guard = repository.lock(Duration::ZERO).await.unwrap();
        repository.append_order(&guard, sample_order("snapcar_new")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(repository.document().path()).unwrap()).unwrap();
        let orders = raw["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0]["orderId"], "snapcar_new");
        assert_eq!(orders[1]["orderId"], "snapcar_good");
        assert_eq!(orders[2], old_form);
        assert_eq!(orders[3], unreadable);
        assert_eq!(backups_in(&dir), 0);
    }

    #[tokio::test]
    async fn test_append_rejects_foreign_guard() {
        let dir = tempfile::tempdir().unwrap();
        let repository = OrderRepository::new(dir.path().join("orders.json"));
        let other = OrderRepository::new(dir.path().join("orders.json"));
        let foreign = other.lock(Duration::ZERO).await.unwrap();

        let result = repository.append_order(&foreign, sample_order("x")).await;
        assert!(matches!(result, Err(crate::utils::errors::AppError::Internal(_))));
        assert!(!repository.document().path().exists());
    }
}
