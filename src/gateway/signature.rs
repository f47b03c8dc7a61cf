use sha2::{Digest, Sha256};

/// Integrity signature the gateway recomputes with the shared key.
///
/// The digest input is `reference || amount_in_cents || currency || key`
/// with the amount as plain decimal digits. Field order and encoding must not
/// change or the gateway rejects the submission.
pub fn generate_signature(
    reference: &str,
    amount_in_cents: i64,
    currency: &str,
    integrity_key: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.as_bytes());
    hasher.update(amount_in_cents.to_string().as_bytes());
    hasher.update(currency.as_bytes());
    hasher.update(integrity_key.as_bytes());
    hex::encode(hasher.finalize())
}
