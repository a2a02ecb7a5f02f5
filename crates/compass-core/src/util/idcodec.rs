//! Reversible, salted encoding of numeric identifiers.
//!
//! ## Summary
//! Database ids are sequential integers; exposing them in URLs invites
//! enumeration. `IdCodec` maps a non-negative integer to an opaque,
//! URL-safe token and back. Encoding is deterministic for a fixed salt and
//! minimum length; decoding rejects anything not produced by this codec
//! under the configured salt.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Base alphabet before salting. URL-safe by construction.
const BASE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of alphabet characters reserved for length padding.
const GUARD_COUNT: usize = 4;

/// Salted identifier codec.
///
/// The salt shuffles the alphabet once at construction. The first characters
/// of the shuffled alphabet become guards (padding only); the rest encode
/// digits. Each id additionally picks a lottery character that re-keys the
/// digit alphabet, so consecutive ids do not produce visibly related tokens.
#[derive(Clone)]
pub struct IdCodec {
    guards: Vec<u8>,
    working: Vec<u8>,
    salt: Vec<u8>,
    min_length: usize,
}

impl fmt::Debug for IdCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdCodec")
            .field("min_length", &self.min_length)
            .finish_non_exhaustive()
    }
}

impl IdCodec {
    /// Builds a codec from the configured secret salt and minimum token
    /// length. Changing either invalidates all previously issued tokens.
    #[must_use]
    pub fn new(salt: &str, min_length: usize) -> Self {
        let mut alphabet = BASE_ALPHABET.to_vec();
        consistent_shuffle(&mut alphabet, salt.as_bytes());

        let working = alphabet.split_off(GUARD_COUNT);
        let guards = alphabet;

        Self {
            guards,
            working,
            salt: salt.as_bytes().to_vec(),
            min_length,
        }
    }

    /// Encodes a non-negative integer into an opaque token of at least the
    /// configured minimum length.
    #[must_use]
    pub fn encode(&self, id: u64) -> String {
        let lottery = self.working[index_of(id, self.working.len())];
        let digit_alphabet = self.digit_alphabet(lottery);

        let mut token = vec![lottery];
        token.extend_from_slice(&to_digits(id, &digit_alphabet));

        let mut pad = 0u64;
        while token.len() < self.min_length {
            token.push(self.guards[index_of(id.wrapping_add(pad), self.guards.len())]);
            pad += 1;
        }

        // Alphabet bytes are ASCII.
        String::from_utf8(token).unwrap_or_default()
    }

    /// Decodes a token back into the integer it was produced from.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidIdentifier` for empty, malformed,
    /// tampered, or foreign-salt input. Never panics.
    pub fn decode(&self, token: &str) -> CoreResult<u64> {
        let invalid = || CoreError::InvalidIdentifier(token.to_string());

        let bytes = token.as_bytes();
        if bytes.len() < 2 {
            return Err(invalid());
        }

        // Guards only ever pad the tail; everything from the first guard on
        // is padding.
        let payload_len = bytes
            .iter()
            .position(|b| self.guards.contains(b))
            .unwrap_or(bytes.len());
        let payload = &bytes[..payload_len];
        if payload.len() < 2 {
            return Err(invalid());
        }

        let lottery = payload[0];
        if !self.working.contains(&lottery) {
            return Err(invalid());
        }

        let digit_alphabet = self.digit_alphabet(lottery);
        let mut id: u64 = 0;
        let base = digit_alphabet.len() as u64;
        for digit in &payload[1..] {
            let value = digit_alphabet
                .iter()
                .position(|b| b == digit)
                .ok_or_else(invalid)?;
            id = id
                .checked_mul(base)
                .and_then(|n| n.checked_add(value as u64))
                .ok_or_else(invalid)?;
        }

        // Round-tripping proves the token canonical: correct lottery,
        // canonical digits, and padding exactly as this codec emits it.
        if self.encode(id) != token {
            return Err(invalid());
        }

        Ok(id)
    }

    /// Per-id digit alphabet, keyed by the lottery character and the salt.
    fn digit_alphabet(&self, lottery: u8) -> Vec<u8> {
        let mut alphabet = self.working.clone();
        let mut salt = Vec::with_capacity(self.salt.len() + 1);
        salt.push(lottery);
        salt.extend_from_slice(&self.salt);
        consistent_shuffle(&mut alphabet, &salt);
        alphabet
    }
}

/// Deterministic Fisher-Yates variant keyed by the salt bytes, as used by
/// the hashids family of encoders.
fn consistent_shuffle(alphabet: &mut [u8], salt: &[u8]) {
    if salt.is_empty() {
        return;
    }

    let mut v = 0usize;
    let mut p = 0usize;
    for i in (1..alphabet.len()).rev() {
        v %= salt.len();
        let t = usize::from(salt[v]);
        p += t;
        let j = (t + v + p) % i;
        alphabet.swap(i, j);
        v += 1;
    }
}

/// Big-endian digits of `id` in the given alphabet.
fn to_digits(id: u64, alphabet: &[u8]) -> Vec<u8> {
    let base = alphabet.len() as u64;
    let mut digits = Vec::new();
    let mut n = id;
    loop {
        digits.push(alphabet[index_of(n, alphabet.len())]);
        n /= base;
        if n == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

fn index_of(n: u64, len: usize) -> usize {
    usize::try_from(n % len as u64).unwrap_or_default()
}
