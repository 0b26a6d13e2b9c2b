//! C1 — canonical, order-independent hashing of structured metadata for
//! provenance (spec §4.1).

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Canonicalizes a serializable value and computes a stable SHA-256 digest
/// over it.
///
/// `serde_json::Value`'s map type is a `BTreeMap` (no `preserve_order`
/// feature enabled in this workspace), so object keys always serialize in
/// sorted order regardless of the order fields were constructed or
/// deserialized in — the "order-independent" guarantee in spec §4.1 falls
/// directly out of that. Floating-point numbers are additionally rewritten
/// to a fixed, round-trippable textual form before serialization, so the
/// digest does not depend on which float formatter a given `serde_json`
/// version happens to use.
pub struct Hasher;

impl Hasher {
    /// Compute the 64-hex-digit SHA-256 digest of `value`'s canonical form.
    pub fn hash<T: Serialize>(value: &T) -> Result<String> {
        let raw = serde_json::to_value(value)
            .map_err(|e| Error::HashSerializationError(e.to_string()))?;
        let canonical = canonicalize(raw);
        let bytes = serde_json::to_vec(&canonical)
            .map_err(|e| Error::HashSerializationError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Marker prefix distinguishing a canonicalized float from an ordinary JSON
/// string that happens to look like one. Collision would require a real
/// string field with this exact literal value, which no field in this
/// workspace's data model produces.
const FLOAT_MARKER: &str = "\u{0}f64:";

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.as_i64().is_none() && n.as_u64().is_none() => {
                Value::String(format!("{FLOAT_MARKER}{f:.17e}"))
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct A {
        x: i32,
        y: f64,
        z: String,
    }

    #[derive(Serialize)]
    struct B {
        z: String,
        y: f64,
        x: i32,
    }

    #[test]
    fn hash_is_order_independent() {
        let a = A { x: 1, y: 2.5, z: "hi".into() };
        let b = B { z: "hi".into(), y: 2.5, x: 1 };
        assert_eq!(Hasher::hash(&a).unwrap(), Hasher::hash(&b).unwrap());
    }

    #[test]
    fn hash_is_deterministic() {
        let a = A { x: 1, y: 2.5, z: "hi".into() };
        assert_eq!(Hasher::hash(&a).unwrap(), Hasher::hash(&a).unwrap());
    }

    #[test]
    fn hash_changes_with_content() {
        let a = A { x: 1, y: 2.5, z: "hi".into() };
        let a2 = A { x: 2, y: 2.5, z: "hi".into() };
        assert_ne!(Hasher::hash(&a).unwrap(), Hasher::hash(&a2).unwrap());
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let a = A { x: 1, y: 2.5, z: "hi".into() };
        let digest = Hasher::hash(&a).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn roundtrip_through_json_preserves_hash() {
        let a = A { x: 1, y: 2.5, z: "hi".into() };
        let json = serde_json::to_string(&a).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(Hasher::hash(&a).unwrap(), Hasher::hash(&reparsed).unwrap());
    }
}
