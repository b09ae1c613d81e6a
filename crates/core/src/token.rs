//! Access token generation.

use std::fmt;
use uuid::Uuid;

/// URL-safe alphabet without visually ambiguous characters (`0`, `1`, `I`, `O`, `l`).
const ALPHABET: &[u8; 57] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A freshly generated access token.
///
/// Only ever held in memory: stores keep a digest of it. `Debug` does not
/// print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Generate a random token.
    ///
    /// The token is a random v4 UUID encoded in base 57, always
    /// [`TOKEN_LEN`](crate::TOKEN_LEN) characters long.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Encode a UUID as a token.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let base = ALPHABET.len() as u128;
        let mut value = uuid.as_u128();
        let mut digits = Vec::with_capacity(crate::TOKEN_LEN);
        while value > 0 {
            digits.push(ALPHABET[(value % base) as usize]);
            value /= base;
        }
        // Left-pad with the zero digit so every token has the same length.
        digits.resize(crate::TOKEN_LEN, ALPHABET[0]);
        digits.reverse();
        Self(digits.into_iter().map(char::from).collect())
    }

    /// Get the token secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the secret.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Whether a string only uses characters a generated token can contain.
pub fn is_token_alphabet(s: &str) -> bool {
    s.bytes().all(|b| ALPHABET.contains(&b))
}
