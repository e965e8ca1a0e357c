//! Module: value::hash
//! Responsibility: stable canonical hashing for values and group-key tuples.
//! Does not own: equality policy (see `compare`), only a hash consistent with it.

use crate::value::{Value, compare::NumericKey};
use xxhash_rust::xxh3::Xxh3;

/// Value-hash format version byte used by canonical digest encoding.
pub(crate) const VALUE_HASH_VERSION: u8 = 1;

/// Stable XXH3 seed used by canonical value hashing.
pub(crate) const VALUE_HASH_SEED: u64 = 0;

///
/// StableHash
///
/// Fixed-width hash identifier used by group-table buckets.
///

pub(crate) type StableHash = u64;

fn feed_u8(h: &mut Xxh3, x: u8) {
    h.update(&[x]);
}
fn feed_u32(h: &mut Xxh3, x: u32) {
    h.update(&x.to_be_bytes());
}
fn feed_i64(h: &mut Xxh3, x: i64) {
    h.update(&x.to_be_bytes());
}
fn feed_u64(h: &mut Xxh3, x: u64) {
    h.update(&x.to_be_bytes());
}
fn feed_bytes(h: &mut Xxh3, b: &[u8]) {
    h.update(b);
}

#[cfg(test)]
thread_local! {
    static TEST_HASH_OVERRIDE: std::cell::Cell<Option<StableHash>> =
        const { std::cell::Cell::new(None) };
}

#[cfg(test)]
fn test_hash_override() -> Option<StableHash> {
    TEST_HASH_OVERRIDE.with(std::cell::Cell::get)
}

// Execute one closure with a thread-local key-hash override and always restore
// the previous override state, even if the closure panics.
#[cfg(test)]
pub(crate) fn with_test_hash_override<T>(
    override_hash: StableHash,
    f: impl FnOnce() -> T + std::panic::UnwindSafe,
) -> T {
    let previous = TEST_HASH_OVERRIDE.with(|cell| cell.replace(Some(override_hash)));
    let result = std::panic::catch_unwind(f);
    TEST_HASH_OVERRIDE.with(|cell| cell.set(previous));
    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

#[expect(clippy::cast_possible_truncation)]
fn write_to_hasher(value: &Value, h: &mut Xxh3) {
    feed_u8(h, value.kind().canonical_tag());

    match value {
        Value::Null => {
            // No additional payload beyond canonical tag.
        }
        Value::Bool(b) => feed_u8(h, u8::from(*b)),
        Value::Int(_) | Value::Decimal(_) | Value::Float64(_) => match NumericKey::of(value) {
            Some(NumericKey::Exact(d)) => {
                // encode (sign, scale, mantissa) of the normalized decimal
                feed_u8(h, 0x01);
                feed_u8(h, u8::from(d.is_sign_negative()));
                feed_u32(h, d.scale());
                feed_bytes(h, &d.mantissa().to_be_bytes());
            }
            Some(NumericKey::Float(bits)) => {
                feed_u8(h, 0x02);
                feed_u64(h, bits);
            }
            None => {}
        },
        Value::Text(s) => {
            feed_u32(h, s.len() as u32);
            feed_bytes(h, s.as_bytes());
        }
        Value::Timestamp(t) => {
            feed_i64(h, t.timestamp());
            feed_u32(h, t.timestamp_subsec_nanos());
        }
        Value::Uuid(u) => feed_bytes(h, u.as_bytes()),
        Value::Blob(v) => {
            feed_u32(h, v.len() as u32);
            feed_bytes(h, v);
        }
    }
}

/// Stable 128-bit digest of one value under canonical equality.
#[must_use]
pub fn hash_value(value: &Value) -> [u8; 16] {
    let mut h = Xxh3::with_seed(VALUE_HASH_SEED);
    feed_u8(&mut h, VALUE_HASH_VERSION);

    write_to_hasher(value, &mut h);
    h.digest128().to_be_bytes()
}

/// Derive one stable 64-bit hash from a canonical digest.
#[must_use]
pub(crate) const fn stable_hash_from_digest(digest: [u8; 16]) -> StableHash {
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// Hash one value with the stable grouping contract.
#[must_use]
pub(crate) fn stable_hash_value(value: &Value) -> StableHash {
    stable_hash_from_digest(hash_value(value))
}

/// Hash one ordered key tuple with the stable grouping contract.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub(crate) fn hash_key_tuple(values: &[Value]) -> StableHash {
    #[cfg(test)]
    if let Some(override_hash) = test_hash_override() {
        return override_hash;
    }

    let mut h = Xxh3::with_seed(VALUE_HASH_SEED);
    feed_u8(&mut h, VALUE_HASH_VERSION);
    feed_u32(&mut h, values.len() as u32);
    for value in values {
        feed_u8(&mut h, 0xFF);
        write_to_hasher(value, &mut h);
    }

    stable_hash_from_digest(h.digest128().to_be_bytes())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn hash_contract_seed_and_version_are_frozen() {
        assert_eq!(VALUE_HASH_SEED, 0);
        assert_eq!(VALUE_HASH_VERSION, 1);
    }

    #[test]
    fn stable_hash_uses_digest_prefix_contract() {
        let digest = [
            0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xF0,
            0x0A, 0x0B,
        ];
        assert_eq!(
            stable_hash_from_digest(digest),
            0x1122_3344_5566_7788,
            "stable hash must use the leading 64 bits of the value digest",
        );
    }

    #[test]
    fn numeric_representations_share_one_hash() {
        let int = Value::Int(20_000);
        let decimal = Value::Decimal(Decimal::new(2_000_000, 2));
        let float = Value::Float64(20_000.0);

        assert_eq!(hash_value(&int), hash_value(&decimal));
        assert_eq!(hash_value(&int), hash_value(&float));
    }

    #[test]
    fn negative_zero_hashes_like_zero() {
        assert_eq!(
            hash_value(&Value::Float64(-0.0)),
            hash_value(&Value::Int(0)),
        );
    }

    #[test]
    fn text_and_numeric_never_share_a_hash() {
        assert_ne!(
            hash_value(&Value::text("1")),
            hash_value(&Value::Int(1)),
            "text '1' and int 1 are distinct keys",
        );
    }

    #[test]
    fn key_tuple_hash_depends_on_component_order() {
        let ab = hash_key_tuple(&[Value::text("a"), Value::text("b")]);
        let ba = hash_key_tuple(&[Value::text("b"), Value::text("a")]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn key_tuple_hash_is_not_a_concatenation() {
        let split = hash_key_tuple(&[Value::text("ab"), Value::text("c")]);
        let moved = hash_key_tuple(&[Value::text("a"), Value::text("bc")]);
        assert_ne!(split, moved, "length prefixes must separate components");
    }
}
