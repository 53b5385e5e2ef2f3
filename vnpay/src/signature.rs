//! # Parameter canonicalization and signing
//!
//! The gateway signs a flat `key=value` parameter set with HMAC-SHA512 over a canonical string: drop the signature
//! fields themselves, sort the remaining keys bytewise ascending, form-urlencode each value (space becomes `+`),
//! and join with `&`. Verification is a byte-exact comparison of hashes, so the exact same canonicalization must
//! be used when building the outbound redirect and when checking the inbound callback. There is no error channel:
//! a divergence shows up only as a signature that never verifies.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// The query field carrying the signature itself.
pub const SECURE_HASH_FIELD: &str = "vnp_SecureHash";
/// An optional field naming the hash algorithm. Participates in neither signing leg.
pub const SECURE_HASH_TYPE_FIELD: &str = "vnp_SecureHashType";

/// Produce the canonical signing string for a parameter set.
///
/// Keys listed in `exclude` are dropped before sorting. The output is deterministic for any iteration order of
/// the input map.
pub fn canonicalize(params: &HashMap<String, String>, exclude: &[&str]) -> String {
    let mut keys = params.keys().filter(|k| !exclude.contains(&k.as_str())).collect::<Vec<_>>();
    keys.sort_unstable();
    keys.into_iter().map(|k| format!("{k}={}", encode_value(&params[k]))).collect::<Vec<_>>().join("&")
}

/// The gateway uses `application/x-www-form-urlencoded` value encoding, i.e. percent-escaping with `+` for spaces.
fn encode_value(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// HMAC-SHA512 over the canonical string, as lowercase hex.
pub fn sign(canonical: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC can take a key of any size");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check the signature carried in `params` against a recomputation from the remaining parameters.
///
/// Never errors: a missing signature field, a malformed hex string and a plain mismatch all return `false`, and
/// the MAC is computed in every one of those cases so none of them is distinguishable by timing. The comparison
/// itself is the constant-time check provided by the `hmac` crate.
pub fn verify(params: &HashMap<String, String>, secret: &[u8]) -> bool {
    let received = params.get(SECURE_HASH_FIELD).and_then(|s| hex::decode(s).ok()).unwrap_or_default();
    let canonical = canonicalize(params, &[SECURE_HASH_FIELD, SECURE_HASH_TYPE_FIELD]);
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC can take a key of any size");
    mac.update(canonical.as_bytes());
    mac.verify_slice(&received).is_ok()
}
