use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a violation finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - account identifier
/// - attribute
pub fn fingerprint_for_violation(
    check_id: &str,
    code: &str,
    account: &str,
    attribute: &str,
) -> String {
    let canonical = [check_id, code, account, attribute].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
