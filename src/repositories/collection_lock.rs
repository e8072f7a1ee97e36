//! Lock exclusivo por colección
//!
//! Un mutex de proceso por documento JSON. Con espera cero el intento es
//! inmediato y falla con `Busy`; con espera positiva se acota con un timeout.
//! El guard se libera al salir de ámbito, en cualquier camino de salida.
//!
//! El guard lleva el tipo de su colección: el guard de pedidos no compila
//! donde se exige el de coches.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::utils::errors::{AppError, AppResult};

/// Colección protegida por un `CollectionLock`
pub trait LockedCollection {
    const NAME: &'static str;
}

pub struct CollectionLock<C> {
    mutex: Arc<Mutex<()>>,
    _collection: PhantomData<fn() -> C>,
}

/// Prueba de que se tiene el lock de la colección `C`
pub struct CollectionGuard<C> {
    mutex: Arc<Mutex<()>>,
    _guard: OwnedMutexGuard<()>,
    _collection: PhantomData<fn() -> C>,
}

impl<C> Clone for CollectionLock<C> {
    fn clone(&self) -> Self {
        Self {
            mutex: self.mutex.clone(),
            _collection: PhantomData,
        }
    }
}

impl<C: LockedCollection> fmt::Debug for CollectionLock<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionLock").field("collection", &C::NAME).finish()
    }
}

impl<C: LockedCollection> fmt::Debug for CollectionGuard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionGuard").field("collection", &C::NAME).finish()
    }
}

impl<C: LockedCollection> Default for CollectionLock<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LockedCollection> CollectionLock<C> {
    pub fn new() -> Self {
        Self {
            mutex: Arc::new(Mutex::new(())),
            _collection: PhantomData,
        }
    }

    pub async fn acquire(&self, wait: Duration) -> AppResult<CollectionGuard<C>> {
        let guard = if wait.is_zero() {
            self.mutex.clone().try_lock_owned().ok()
        } else {
            tokio::time::timeout(wait, self.mutex.clone().lock_owned())
                .await
                .ok()
        };

        match guard {
            Some(guard) => Ok(CollectionGuard {
                mutex: self.mutex.clone(),
                _guard: guard,
                _collection: PhantomData,
            }),
            None => {
                log::warn!("🔒 No se pudo obtener el lock de {}", C::NAME);
                Err(AppError::Busy(
                    "Server busy. Please try again in a moment.".to_string(),
                ))
            }
        }
    }

    /// Comprobar que el guard viene de este lock y no de otra instancia
    pub fn verify(&self, guard: &CollectionGuard<C>) -> AppResult<()> {
        if Arc::ptr_eq(&self.mutex, &guard.mutex) {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "Guard does not belong to the {} lock",
                C::NAME
            )))
        }
    }
}
