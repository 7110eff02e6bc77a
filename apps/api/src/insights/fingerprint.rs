//! Content fingerprint: a cheap change detector over a check-in list.
//!
//! The list is serialized with `serde_json` (struct field order is fixed by the
//! `CheckIn` declaration, so the text form is stable) and streamed into a BLAKE3
//! hasher. The fingerprint keeps the first 8 bytes of the digest, so it is only an
//! equality check: a collision costs a stale cache hit and nothing more.

use std::fmt;

use crate::models::checkin::CheckIn;

/// Fingerprint of a serialized record list. Rendered as a decimal string when persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// True when a persisted hash string matches this fingerprint exactly.
    pub fn matches(self, stored: &str) -> bool {
        stored.trim().parse::<u64>().map(|v| v == self.0).unwrap_or(false)
    }

    fn from_digest(digest: &blake3::Hash) -> Self {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest.as_bytes()[..8]);
        Self(u64::from_le_bytes(prefix))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fingerprints an ordered check-in list. Same values in the same order → same fingerprint.
pub fn fingerprint(records: &[CheckIn]) -> Result<Fingerprint, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, records)?;
    Ok(Fingerprint::from_digest(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checkin::sample_check_in;

    #[test]
    fn test_digest_prefix_is_little_endian() {
        // BLAKE3("") = af1349b9f5f9a1a6...
        let digest = blake3::hash(b"");
        assert_eq!(
            digest.to_hex().as_str(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(Fingerprint::from_digest(&digest), Fingerprint(0xa6a1_f9f5_b949_13af));
    }

    #[test]
    fn test_streamed_serialization_matches_one_shot_hash() {
        let records = vec![sample_check_in(1, "happy", 2, 9)];
        let text = serde_json::to_vec(&records).unwrap();
        assert_eq!(
            fingerprint(&records).unwrap(),
            Fingerprint::from_digest(&blake3::hash(&text))
        );
    }

    #[test]
    fn test_identical_sequences_share_fingerprint() {
        let first = vec![sample_check_in(1, "happy", 2, 9), sample_check_in(2, "sad", 8, 3)];
        let second = first.clone();
        assert_eq!(fingerprint(&first).unwrap(), fingerprint(&second).unwrap());
    }

    #[test]
    fn test_changed_field_changes_fingerprint() {
        let original = vec![sample_check_in(1, "happy", 2, 9)];
        let edited = vec![sample_check_in(1, "happy", 3, 9)];
        assert_ne!(fingerprint(&original).unwrap(), fingerprint(&edited).unwrap());
    }

    #[test]
    fn test_order_matters() {
        let a = sample_check_in(1, "happy", 2, 9);
        let b = sample_check_in(2, "sad", 8, 3);
        assert_ne!(
            fingerprint(&[a.clone(), b.clone()]).unwrap(),
            fingerprint(&[b, a]).unwrap()
        );
    }

    #[test]
    fn test_matches_decimal_string() {
        let fp = fingerprint(&[sample_check_in(1, "neutral", 5, 5)]).unwrap();
        assert!(fp.matches(&fp.to_string()));
        assert!(!fp.matches("12345"));
        assert!(!fp.matches("not-a-number"));
    }
}
