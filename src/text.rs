//! Small string helpers shared by the analysis code.

use rand::Rng;

/// Default alphabet for [`random_string`]: uppercase ASCII plus digits.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Compare two byte-like values as text.
///
/// Byte-strings and text that spell the same UTF-8 sequence compare equal,
/// so `same_string(b"abc", "abc")` holds.
pub fn same_string(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> bool {
    a.as_ref() == b.as_ref()
}

/// Uniformly random string over [`DEFAULT_ALPHABET`].
///
/// Not cryptographically secure; each call draws independently from the
/// thread-local generator.
pub fn random_string(length: usize) -> String {
    random_string_from(length, DEFAULT_ALPHABET)
}

/// Uniformly random string drawn with replacement from `chars`.
///
/// An empty `chars` pool yields an empty string.
pub fn random_string_from(length: usize, chars: &str) -> String {
    let pool: Vec<char> = chars.chars().collect();
    if pool.is_empty() {
        return String::new();
    }
    let mut rng = rand::thread_rng();
    (0..length).map(|_| pool[rng.gen_range(0..pool.len())]).collect()
}
