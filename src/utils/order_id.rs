//! Generación de identificadores de pedido
//!
//! Formato: `snapcar_` + milisegundos unix en hexadecimal + sufijo aleatorio base36.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const ORDER_ID_PREFIX: &str = "snapcar_";

const SUFFIX_LEN: usize = 5;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generar un orderId para el instante `now`
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{}{:x}{}", ORDER_ID_PREFIX, now.timestamp_millis(), suffix)
}

/// Generar un orderId que no exista todavía según `exists`
pub fn generate_unique_order_id<F>(now: DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let candidate = generate_order_id(now);
        if !exists(&candidate) {
            return candidate;
        }
        log::debug!("🔁 orderId {} ya existe, generando otro", candidate);
    }
}
