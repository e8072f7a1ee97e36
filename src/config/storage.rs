//! Configuración de almacenamiento
//!
//! Ubicación de los documentos JSON de coches y pedidos.

use std::path::{Path, PathBuf};

/// Configuración de los ficheros de datos
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub cars_file: String,
    pub orders_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cars_file: "cars.json".to_string(),
            orders_file: "orders.json".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cars_file: std::env::var("CARS_FILE").unwrap_or(defaults.cars_file),
            orders_file: std::env::var("ORDERS_FILE").unwrap_or(defaults.orders_file),
        }
    }

    /// Configuración apuntando a un directorio concreto (tests, herramientas)
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn cars_path(&self) -> PathBuf {
        self.data_dir.join(&self.cars_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }
}
