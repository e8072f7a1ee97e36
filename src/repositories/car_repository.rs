use std::path::PathBuf;
use std::time::Duration;

use crate::models::{Car, CarCollection};
use crate::repositories::collection_lock::{CollectionGuard, CollectionLock, LockedCollection};
use crate::repositories::json_document::{DocumentState, JsonDocument, LoadedDocument};
use crate::utils::errors::{not_found_error, AppResult};

impl LockedCollection for CarCollection {
    const NAME: &'static str = "cars";
}

/// Catálogo de coches respaldado por `cars.json`.
///
/// No hay caché: cada lectura vuelve al fichero, así un coche recién
/// reservado aparece como no disponible sin reiniciar nada.
#[derive(Debug, Clone)]
pub struct CarRepository {
    document: JsonDocument<CarCollection>,
    lock: CollectionLock<CarCollection>,
}

impl CarRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: JsonDocument::new(path),
            lock: CollectionLock::new(),
        }
    }

    pub fn document(&self) -> &JsonDocument<CarCollection> {
        &self.document
    }

    pub async fn lock(&self, wait: Duration) -> AppResult<CollectionGuard<CarCollection>> {
        self.lock.acquire(wait).await
    }

    pub fn verify_guard(&self, guard: &CollectionGuard<CarCollection>) -> AppResult<()> {
        self.lock.verify(guard)
    }

    pub async fn load_collection(&self) -> AppResult<LoadedDocument<CarCollection>> {
        let loaded = self.document.load().await?;
        let skipped = loaded.value.unparsed_count();
        if skipped > 0 {
            log::warn!(
                "⚠️ {} entradas de {} no son coches válidos y se omiten del catálogo",
                skipped,
                self.document.path().display()
            );
        }
        Ok(loaded)
    }

    pub async fn load_catalog(&self) -> AppResult<Vec<Car>> {
        Ok(self.load_collection().await?.value.into_cars())
    }

    pub async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Car>> {
        let collection = self.load_collection().await?.value;
        Ok(collection.find_by_vin(vin).cloned())
    }

    /// Cambiar `available` de un coche. Exige el lock de esta colección.
    pub async fn update_availability(
        &self,
        guard: &CollectionGuard<CarCollection>,
        vin: &str,
        available: bool,
    ) -> AppResult<Car> {
        self.verify_guard(guard)?;

        let loaded = self.load_collection().await?;
        let mut collection = loaded.value;

        let car = collection
            .find_by_vin_mut(vin)
            .ok_or_else(|| not_found_error("Car with VIN", vin))?;
        car.available = available;
        let updated = car.clone();

        if loaded.state == DocumentState::Corrupt {
            self.document.backup_corrupt().await?;
        }
        self.document.write(&collection).await?;

        log::info!("🚗 Disponibilidad de {} actualizada a {}", vin, available);
        Ok(updated)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::Map;

    pub(crate) fn sample_car(vin: &str, price_per_day: f64, available: bool) -> Car {
        Car {
            vin: vin.to_string(),
            brand: "Hyundai".to_string(),
            car_model: "Avante".to_string(),
            year_of_manufacture: 2022,
            car_type: "Sedan".to_string(),
            fuel_type: "Gasoline".to_string(),
            mileage: 12_000,
            price_per_day,
            image: None,
            description: Some("Compact sedan".to_string()),
            available,
            extra: Map::new(),
        }
    }

    async fn repository_with(cars: Vec<Car>) -> (tempfile::TempDir, CarRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repository = CarRepository::new(dir.path().join("cars.json"));
        repository
            .document()
            .write(&CarCollection::from(cars))
            .await
            .unwrap();
        (dir, repository)
    }

    #[tokio::test]
    async fn test_load_catalog_is_repeatable() {
        let (_dir, repository) =
            repository_with(vec![sample_car("V1", 50.0, true), sample_car("V2", 70.0, false)]).await;

        let first = repository.load_catalog().await.unwrap();
        let second = repository.load_catalog().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_find_by_vin() {
        let (_dir, repository) = repository_with(vec![sample_car("V1", 50.0, true)]).await;

        assert_eq!(repository.find_by_vin("V1").await.unwrap().unwrap().vin, "V1");
        assert!(repository.find_by_vin("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repository = CarRepository::new(dir.path().join("cars.json"));
        assert!(repository.load_catalog().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_availability() {
        let (_dir, repository) = repository_with(vec![sample_car("V1", 50.0, true)]).await;
        let guard = repository.lock(Duration::ZERO).await.unwrap();

        let updated = repository.update_availability(&guard, "V1", false).await.unwrap();
        assert!(!updated.available);
        assert!(!repository.find_by_vin("V1").await.unwrap().unwrap().available);

        let missing = repository.update_availability(&guard, "V9", true).await;
        assert!(matches!(missing, Err(crate::utils::errors::AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_availability_rejects_foreign_guard() {
        let (_dir, repository) = repository_with(vec![sample_car("V1", 50.0, true)]).await;
        let other = CarRepository::new(repository.document().path());
        let foreign = other.lock(Duration::ZERO).await.unwrap();

        let result = repository.update_availability(&foreign, "V1", false).await;
        assert!(matches!(result, Err(crate::utils::errors::AppError::Internal(_))));
        assert!(repository.find_by_vin("V1").await.unwrap().unwrap().available);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_skipped_and_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let repository = CarRepository::new(dir.path().join("cars.json"));
        let mut good = serde_json::to_value(sample_car("V1", 50.0, true)).unwrap();
        good["featured"] = serde_json::json!(true);
        let broken = serde_json::json!({ "vin": "V2", "mileage": "lots" });
        std::fs::write(
            repository.document().path(),
            serde_json::json!({ "cars": [good, broken.clone()] }).to_string(),
        )
        .unwrap();

        let catalog = repository.load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].vin, "V1");

        let guard = repository.lock(Duration::ZERO).await.unwrap();
        repository.update_availability(&guard, "V1", false).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(repository.document().path()).unwrap()).unwrap();
        assert_eq!(raw["cars"][0]["available"], false);
        assert_eq!(raw["cars"][0]["featured"], true);
        assert_eq!(raw["cars"][1], broken);
    }
}
