//! Bounded random helpers shared by the room and question layers.
//!
//! Every helper takes the RNG explicitly so callers can pass a seeded
//! `StdRng` in tests and `rand::rng()` in production.

use rand::Rng;
use rand::distr::uniform::SampleUniform;

use crate::RoomId;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Uniform integer in `lo..=hi`.
///
/// # Panics
/// Panics if `lo > hi`.
pub fn randint<T, R>(rng: &mut R, lo: T, hi: T) -> T
where
    T: SampleUniform + PartialOrd,
    R: Rng + ?Sized,
{
    rng.random_range(lo..=hi)
}

/// Lower-case base-36 token of `len` characters.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_ALPHABET.len());
            char::from(TOKEN_ALPHABET[idx])
        })
        .collect()
}

impl RoomId {
    /// Draws a room code uniformly from `100000..=999999`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(randint(rng, Self::MIN, Self::MAX).to_string())
    }
}
