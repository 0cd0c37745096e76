//! Canonical parameter signing and verification.
//!
//! Implements the provider's secure-hash scheme: parameters are
//! canonicalized (hash fields removed, keys sorted byte-wise ascending,
//! `key=value` pairs form-urlencoded and joined with `&`) and signed with
//! HMAC-SHA512 under a shared secret, encoded as lowercase hex.
//!
//! This is the sole authenticity boundary for provider-originated input.
//! Nothing in a callback body may be trusted before `verify` passes.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use url::form_urlencoded;

/// Parameter carrying the signature itself; excluded from canonicalization.
pub const SECURE_HASH_FIELD: &str = "vnp_SecureHash";

/// Legacy parameter naming the hash algorithm; also excluded.
pub const SECURE_HASH_TYPE_FIELD: &str = "vnp_SecureHashType";

/// Signs and verifies canonical parameter sets.
pub struct SecureHashSigner {
    /// Shared secret agreed with the provider.
    secret: String,
}

impl SecureHashSigner {
    /// Creates a new signer with the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the lowercase hex HMAC-SHA512 signature over the canonical
    /// form of `params`. Hash fields present in the input are ignored.
    pub fn sign(&self, params: &HashMap<String, String>) -> String {
        let canonical = canonicalize(params);
        let mut mac = Hmac::<Sha512>::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(canonical.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verifies a candidate signature against the canonical form of
    /// `params`, in constant time.
    ///
    /// Any reordering, addition, removal, or mutation of a parameter
    /// changes the canonical string and fails verification.
    pub fn verify(&self, params: &HashMap<String, String>, candidate: &str) -> bool {
        let expected = self.sign(params);
        constant_time_compare(expected.as_bytes(), candidate.as_bytes())
    }
}

/// Builds the canonical signing string: hash fields removed, keys sorted
/// byte-wise ascending, pairs form-urlencoded (space as `+`) and joined
/// with `&`.
fn canonicalize(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(k, _)| k.as_str() != SECURE_HASH_FIELD && k.as_str() != SECURE_HASH_TYPE_FIELD)
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "vnpay_test_hash_secret";

    fn sample_params() -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("vnp_Version".to_string(), "2.1.0".to_string());
        params.insert("vnp_Command".to_string(), "pay".to_string());
        params.insert("vnp_TmnCode".to_string(), "VOWPAGE1".to_string());
        params.insert("vnp_Amount".to_string(), "50000000".to_string());
        params.insert("vnp_TxnRef".to_string(), "abc-123".to_string());
        params.insert(
            "vnp_OrderInfo".to_string(),
            "Thanh toan goi BASIC".to_string(),
        );
        params
    }

    #[test]
    fn canonical_string_sorts_keys_and_encodes_values() {
        let mut params = HashMap::new();
        params.insert("b".to_string(), "two words".to_string());
        params.insert("a".to_string(), "1".to_string());
        params.insert("c".to_string(), "x&y=z".to_string());

        assert_eq!(canonicalize(&params), "a=1&b=two+words&c=x%26y%3Dz");
    }

    #[test]
    fn canonicalization_drops_hash_fields() {
        let mut params = sample_params();
        let without_hash = canonicalize(&params);
        params.insert(SECURE_HASH_FIELD.to_string(), "deadbeef".to_string());
        params.insert(SECURE_HASH_TYPE_FIELD.to_string(), "SHA512".to_string());
        assert_eq!(canonicalize(&params), without_hash);
    }

    #[test]
    fn signature_is_lowercase_hex_sha512() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let signature = signer.sign(&sample_params());
        // SHA-512 digest is 64 bytes = 128 hex chars
        assert_eq!(signature.len(), 128);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn valid_signature_verifies() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let params = sample_params();
        let signature = signer.sign(&params);
        assert!(signer.verify(&params, &signature));
    }

    #[test]
    fn signature_embedded_in_params_still_verifies() {
        // Callbacks arrive with the hash inside the parameter map.
        let signer = SecureHashSigner::new(TEST_SECRET);
        let mut params = sample_params();
        let signature = signer.sign(&params);
        params.insert(SECURE_HASH_FIELD.to_string(), signature.clone());
        assert!(signer.verify(&params, &signature));
    }

    #[test]
    fn wrong_secret_fails() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let other = SecureHashSigner::new("some_other_secret");
        let params = sample_params();
        let signature = signer.sign(&params);
        assert!(!other.verify(&params, &signature));
    }

    #[test]
    fn added_parameter_fails() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let mut params = sample_params();
        let signature = signer.sign(&params);
        params.insert("vnp_Extra".to_string(), "1".to_string());
        assert!(!signer.verify(&params, &signature));
    }

    #[test]
    fn removed_parameter_fails() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let mut params = sample_params();
        let signature = signer.sign(&params);
        params.remove("vnp_Amount");
        assert!(!signer.verify(&params, &signature));
    }

    #[test]
    fn mutated_value_fails() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        let mut params = sample_params();
        let signature = signer.sign(&params);
        params.insert("vnp_Amount".to_string(), "50000001".to_string());
        assert!(!signer.verify(&params, &signature));
    }

    #[test]
    fn wrong_length_candidate_fails() {
        let signer = SecureHashSigner::new(TEST_SECRET);
        assert!(!signer.verify(&sample_params(), "abc"));
        assert!(!signer.verify(&sample_params(), ""));
    }

    proptest! {
        /// Flipping any single character of any parameter value must
        /// invalidate the signature.
        #[test]
        fn any_single_character_flip_invalidates(
            values in proptest::collection::hash_map(
                "[a-zA-Z_]{1,12}",
                "[a-zA-Z0-9 .:-]{1,20}",
                1..6,
            ),
            pick in any::<prop::sample::Index>(),
            flip in any::<prop::sample::Index>(),
        ) {
            let signer = SecureHashSigner::new(TEST_SECRET);
            let params: HashMap<String, String> = values;
            let signature = signer.sign(&params);

            let keys: Vec<String> = params.keys().cloned().collect();
            let key = keys[pick.index(keys.len())].clone();
            let original = params[&key].clone();

            let idx = flip.index(original.len());
            let mut bytes = original.clone().into_bytes();
            // Flip within printable ASCII so the value stays a valid string.
            bytes[idx] = if bytes[idx] == b'x' { b'y' } else { b'x' };
            let mutated = String::from_utf8(bytes).unwrap();
            prop_assume!(mutated != original);

            let mut tampered = params.clone();
            tampered.insert(key, mutated);
            prop_assert!(!signer.verify(&tampered, &signature));
        }
    }
}
