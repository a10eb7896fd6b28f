//! Webhook MAC verification.
//!
//! The gateway signs webhook deliveries with HMAC-SHA1 over the field
//! values: every field except `mac` is taken, field names are sorted
//! lexicographically, and the values are joined with `|` in that order.
//! The digest is hex-encoded lowercase and sent as the `mac` field.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// Field name carrying the signature; excluded from the signed message.
pub const MAC_FIELD: &str = "mac";

/// Recompute the expected MAC over the webhook fields.
pub fn compute_mac(fields: &BTreeMap<String, String>, salt: &str) -> Option<String> {
    let message = fields
        .iter()
        .filter(|(name, _)| name.as_str() != MAC_FIELD)
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join("|");

    let mut mac = match HmacSha1::new_from_slice(salt.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return None,
    };
    mac.update(message.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify the `mac` field against the recomputed digest. A payload without
/// a `mac` field never verifies.
pub fn verify_mac(fields: &BTreeMap<String, String>, salt: &str) -> bool {
    let Some(supplied) = fields.get(MAC_FIELD) else {
        return false;
    };
    let Some(expected) = compute_mac(fields, salt) else {
        return false;
    };
    secure_eq(expected.as_bytes(), supplied.trim().as_bytes())
}

pub fn secure_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0_u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
