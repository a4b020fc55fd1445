use rand::{rng, Rng};

/// Length of generated slugs. 62^6 combinations keep the collision
/// probability negligible at this service's scale.
pub const SLUG_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws a slug of `length` characters uniformly from the alphanumeric
/// alphabet (lowercase, uppercase, digits).
pub fn random_slug(length: usize) -> String {
    let mut rng = rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}
