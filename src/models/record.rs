//! Registro individual de una colección JSON
//!
//! Cada elemento se lee por separado: si no encaja con el modelo se conserva
//! tal cual y se reescribe sin cambios. Un registro antiguo o con otro formato
//! no invalida el resto del documento.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Record<T> {
    /// Leído del fichero; se reescribe con `raw` mientras no se modifique
    Stored { raw: Value, parsed: Option<T> },
    /// Creado o modificado por este servicio; se serializa desde el modelo
    Modified(T),
}

impl<T> Record<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Record::Stored { parsed, .. } => parsed.as_ref(),
            Record::Modified(value) => Some(value),
        }
    }

    /// JSON original, solo para registros sin modificar
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Record::Stored { raw, .. } => Some(raw),
            Record::Modified(_) => None,
        }
    }

    pub fn is_unparsed(&self) -> bool {
        self.parsed().is_none()
    }

    /// Acceso mutable; a partir de aquí el registro se reescribe desde el modelo
    pub fn parsed_mut(&mut self) -> Option<&mut T> {
        if let Record::Stored { parsed, .. } = self {
            let value = parsed.take()?;
            *self = Record::Modified(value);
        }

        match self {
            Record::Modified(value) => Some(value),
            Record::Stored { .. } => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let parsed = T::deserialize(&raw).ok();
        Ok(Record::Stored { raw, parsed })
    }
}

impl<T: Serialize> Serialize for Record<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Record::Stored { raw, .. } => raw.serialize(serializer),
            Record::Modified(value) => value.serialize(serializer),
        }
    }
}
