use sha2::{Digest, Sha256};

/// Submitted documents are accepted only when they are byte-for-byte the
/// government's copy. Re-saved or re-scanned copies do not match.
pub struct DocumentComparator;

impl DocumentComparator {
    pub fn compare(submitted: &[u8], government: &[u8]) -> bool {
        let identical = submitted == government;
        if !identical {
            log::debug!(
                "Document mismatch: submitted {} bytes sha256={}, government {} bytes sha256={}",
                submitted.len(),
                Self::fingerprint(submitted),
                government.len(),
                Self::fingerprint(government)
            );
        }
        identical
    }

    /// For logs only; never used to decide a match.
    pub fn fingerprint(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }
}
