//! Document identifiers
//!
//! A `DocumentId` is a 26-character Crockford base32 string: a 48-bit
//! millisecond timestamp followed by 80 bits of randomness. Ids generated
//! later sort lexicographically after ids generated earlier.

use std::fmt;

use chrono::Utc;
use rand::Rng;

/// Crockford base32 alphabet (no I, L, O, U)
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of the encoded identifier
const ENCODED_LEN: usize = 26;

/// Number of random bits following the timestamp
const RANDOM_BITS: u32 = 80;

/// Value object wrapping a sortable document identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier string without validating it.
    ///
    /// Use [`DocumentId::is_valid`] first when the string comes from a caller.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier from the current time and random bits.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random = rand::thread_rng().gen::<u128>() & ((1u128 << RANDOM_BITS) - 1);
        Self::from_parts(millis, random)
    }

    /// Builds an identifier from an explicit timestamp and random component.
    pub fn from_parts(timestamp_millis: u64, random: u128) -> Self {
        // 48 bits of time, 80 bits of randomness, encoded 5 bits per char
        // from the most significant end (top 2 bits of the u128 stay zero).
        let value = (u128::from(timestamp_millis) << RANDOM_BITS)
            | (random & ((1u128 << RANDOM_BITS) - 1));

        let mut encoded = String::with_capacity(ENCODED_LEN);
        for i in 0..ENCODED_LEN {
            let shift = 5 * (ENCODED_LEN - 1 - i);
            let index = ((value >> shift) & 0x1F) as usize;
            encoded.push(ALPHABET[index] as char);
        }

        Self(encoded)
    }

    /// Checks the caller-supplied id format: exactly 26 characters, each an
    /// ASCII digit or uppercase letter.
    pub fn is_valid(value: &str) -> bool {
        value.len() == ENCODED_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_has_expected_format() {
        let id = DocumentId::generate();
        assert_eq!(id.as_str().len(), 26);
        assert!(DocumentId::is_valid(id.as_str()));
    }

    #[test]
    fn test_later_timestamp_sorts_after_earlier() {
        let earlier = DocumentId::from_parts(1_000_000, u128::MAX);
        let later = DocumentId::from_parts(1_000_001, 0);
        assert!(later.as_str() > earlier.as_str());
    }

    #[test]
    fn test_same_timestamp_differs_by_random_component() {
        let a = DocumentId::from_parts(42, 1);
        let b = DocumentId::from_parts(42, 2);
        assert_ne!(a, b);
        assert_eq!(&a.as_str()[..10], &b.as_str()[..10]);
    }

    #[test]
    fn test_is_valid_rejects_bad_formats() {
        assert!(!DocumentId::is_valid("short"));
        assert!(!DocumentId::is_valid("abcdefghijklmnopqrstuvwxyz")); // lowercase
        assert!(!DocumentId::is_valid("0123456789ABCDEF0123456789!")); // 27 chars, punct
        assert!(DocumentId::is_valid("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
    }

    #[test]
    fn test_zero_parts_encode_to_all_zeros() {
        let id = DocumentId::from_parts(0, 0);
        assert_eq!(id.as_str(), "00000000000000000000000000");
    }
}
