//! Captcha string challenge.
//!
//! A short alphanumeric string the player must type back exactly. The
//! distorted rendering is a presentation concern; the logic here is
//! generation and case-sensitive comparison.

use rand::Rng;
use tracing::instrument;

/// Characters a challenge string is drawn from: digits, then lowercase,
/// then uppercase letters.
const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default challenge length.
pub const DEFAULT_LEN: usize = 6;

/// One captcha round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captcha {
    value: String,
}

impl Captcha {
    /// Draws a fresh `len`-character challenge string.
    #[instrument(skip(rng))]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let value = (0..len)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        Self { value }
    }

    /// The string the player must reproduce.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Case-sensitive comparison against the player's input.
    pub fn verify(&self, input: &str) -> bool {
        input == self.value
    }

    /// Replaces the challenge with a freshly drawn string.
    #[instrument(skip(self, rng))]
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R, len: usize) {
        *self = Self::generate(rng, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_generated_length_and_charset() {
        let mut rng = SmallRng::seed_from_u64(7);
        let captcha = Captcha::generate(&mut rng, DEFAULT_LEN);
        assert_eq!(captcha.value().len(), DEFAULT_LEN);
        assert!(captcha.value().bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let mut rng = SmallRng::seed_from_u64(7);
        let captcha = Captcha::generate(&mut rng, DEFAULT_LEN);
        let value = captcha.value().to_string();
        assert!(captcha.verify(&value));
        if value.to_ascii_uppercase() != value {
            assert!(!captcha.verify(&value.to_ascii_uppercase()));
        }
        assert!(!captcha.verify(""));
    }

    #[test]
    fn test_refresh_redraws() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut captcha = Captcha::generate(&mut rng, DEFAULT_LEN);
        let before = captcha.value().to_string();
        // with a 62-character alphabet a same-string redraw is not a
        // realistic seed outcome; assert on length either way
        captcha.refresh(&mut rng, DEFAULT_LEN);
        assert_eq!(captcha.value().len(), DEFAULT_LEN);
        assert_ne!(captcha.value(), before);
    }
}
