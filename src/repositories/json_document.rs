//! Documento JSON persistido como fichero completo
//!
//! Lectura tolerante (fichero inexistente, vacío o corrupto = colección vacía)
//! y escritura en dos fases: primero a un fichero temporal hermano, luego
//! `rename` sobre el destino. Un lector nunca ve un fichero a medio escribir.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::utils::errors::{storage_error, AppResult};

/// Estado del fichero en el momento de la lectura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Missing,
    Empty,
    Corrupt,
    Loaded,
}

/// Resultado de una lectura
#[derive(Debug, Clone)]
pub struct LoadedDocument<T> {
    pub value: T,
    pub state: DocumentState,
}

/// Fichero temporal ya escrito y sincronizado, pendiente de `commit`
#[derive(Debug)]
pub struct PreparedWrite {
    tmp_path: PathBuf,
    target: PathBuf,
}

impl PreparedWrite {
    /// Reemplazar el destino de forma atómica
    pub async fn commit(self) -> AppResult<()> {
        if let Err(e) = fs::rename(&self.tmp_path, &self.target).await {
            let _ = fs::remove_file(&self.tmp_path).await;
            return Err(storage_error(
                &format!("Error renaming into {}", self.target.display()),
                e,
            ));
        }
        Ok(())
    }

    /// Descartar el fichero temporal sin tocar el destino
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.tmp_path).await {
            log::warn!("⚠️ No se pudo borrar {}: {}", self.tmp_path.display(), e);
        }
    }
}

#[derive(Debug)]
pub struct JsonDocument<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonDocument<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leer el documento completo
    pub async fn load(&self) -> AppResult<LoadedDocument<T>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("📄 {} no existe, colección vacía", self.path.display());
                return Ok(LoadedDocument {
                    value: T::default(),
                    state: DocumentState::Missing,
                });
            }
            Err(e) => {
                return Err(storage_error(
                    &format!("Error reading {}", self.path.display()),
                    e,
                ))
            }
        };

        if raw.trim().is_empty() {
            return Ok(LoadedDocument {
                value: T::default(),
                state: DocumentState::Empty,
            });
        }

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(LoadedDocument {
                value,
                state: DocumentState::Loaded,
            }),
            Err(e) => {
                log::warn!(
                    "⚠️ JSON inválido en {}, se trata como colección vacía: {}",
                    self.path.display(),
                    e
                );
                Ok(LoadedDocument {
                    value: T::default(),
                    state: DocumentState::Corrupt,
                })
            }
        }
    }

    /// Primera fase: escribir el contenido nuevo en un temporal junto al destino
    pub async fn prepare(&self, value: &T) -> AppResult<PreparedWrite> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| storage_error(&format!("Error encoding {}", self.path.display()), e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                storage_error(&format!("Error creating {}", parent.display()), e)
            })?;
        }

        let tmp_path = self.tmp_path();
        let written = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(storage_error(
                &format!("Error writing {}", tmp_path.display()),
                e,
            ));
        }

        Ok(PreparedWrite {
            tmp_path,
            target: self.path.clone(),
        })
    }

    /// Reescribir el documento completo (ambas fases)
    pub async fn write(&self, value: &T) -> AppResult<()> {
        self.prepare(value).await?.commit().await
    }

    /// Copiar un fichero corrupto antes de sobrescribirlo
    pub async fn backup_corrupt(&self) -> AppResult<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let backup = PathBuf::from(format!("{}.corrupt-{}", self.path.display(), stamp));
        fs::copy(&self.path, &backup).await.map_err(|e| {
            storage_error(&format!("Error backing up {}", self.path.display()), e)
        })?;
        log::warn!(
            "🗄️ Copia de {} guardada en {} antes de reinicializar",
            self.path.display(),
            backup.display()
        );
        Ok(backup)
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        self.path
            .with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()))
    }
}
