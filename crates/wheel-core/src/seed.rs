//! Share seed: the index and segment colors carried in a query string.
//!
//! Query shape: `w=<index>&c=<token>`. The token packs two base-5 segment
//! categories per base-36 character, so 36 segments fit in 18 characters.
//! Seeds are trusted apart from range checks; anything absent or malformed
//! falls back to a random value.

use crate::constants::{INIT_INDEX, MAX_INDEX, PALETTE_CATEGORIES, SLOT_COLOR_COUNT};
use crate::error::SeedError;
use rand::Rng;

pub const INDEX_PARAM: &str = "w";
pub const COLORS_PARAM: &str = "c";
pub const TOKEN_LEN: usize = SLOT_COLOR_COUNT / 2;

const TOKEN_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WheelSeed {
    pub index: i64,
    pub slot_colors: [u8; SLOT_COLOR_COUNT],
}

impl Default for WheelSeed {
    fn default() -> Self {
        Self {
            index: INIT_INDEX,
            slot_colors: [0; SLOT_COLOR_COUNT],
        }
    }
}

impl WheelSeed {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            index: rng.gen_range(0..MAX_INDEX),
            slot_colors: random_slot_colors(rng),
        }
    }

    /// Build a seed from a query string (with or without the leading `?`).
    /// Each part falls back to a random value on its own.
    pub fn from_query_or_random<R: Rng + ?Sized>(query: Option<&str>, rng: &mut R) -> Self {
        let query = query.unwrap_or("");
        let index = match find_param(query, INDEX_PARAM).map(parse_index) {
            Some(Ok(i)) => i,
            Some(Err(e)) => {
                log::warn!("[seed] {}; using a random index", e);
                rng.gen_range(0..MAX_INDEX)
            }
            None => rng.gen_range(0..MAX_INDEX),
        };
        let slot_colors = match find_param(query, COLORS_PARAM).map(decode_token) {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                log::warn!("[seed] {}; using random colors", e);
                random_slot_colors(rng)
            }
            None => random_slot_colors(rng),
        };
        Self { index, slot_colors }
    }

    /// Query string (without `?`) that reproduces this seed.
    pub fn to_query(&self) -> String {
        format!(
            "{}={}&{}={}",
            INDEX_PARAM,
            self.index.rem_euclid(MAX_INDEX),
            COLORS_PARAM,
            encode_token(&self.slot_colors)
        )
    }
}

fn random_slot_colors<R: Rng + ?Sized>(rng: &mut R) -> [u8; SLOT_COLOR_COUNT] {
    let mut out = [0u8; SLOT_COLOR_COUNT];
    for c in out.iter_mut() {
        *c = rng.gen_range(0..PALETTE_CATEGORIES as u8);
    }
    out
}

fn find_param<'q>(query: &'q str, key: &str) -> Option<&'q str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Parse an index and clamp it into `[0, MAX_INDEX]`.
pub fn parse_index(raw: &str) -> Result<i64, SeedError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SeedError::InvalidIndex(raw.to_string()))?;
    Ok(value.clamp(0, MAX_INDEX))
}

pub fn encode_token(slot_colors: &[u8; SLOT_COLOR_COUNT]) -> String {
    let base = PALETTE_CATEGORIES as u8;
    slot_colors
        .chunks(2)
        .map(|pair| {
            let hi = pair[0] % base;
            let lo = pair.get(1).copied().unwrap_or(0) % base;
            TOKEN_ALPHABET[(hi * base + lo) as usize] as char
        })
        .collect()
}

pub fn decode_token(token: &str) -> Result<[u8; SLOT_COLOR_COUNT], SeedError> {
    let token = token.trim();
    let len = token.chars().count();
    if len != TOKEN_LEN {
        return Err(SeedError::TokenLength {
            expected: TOKEN_LEN,
            found: len,
        });
    }
    let base = PALETTE_CATEGORIES as u32;
    let mut out = [0u8; SLOT_COLOR_COUNT];
    for (i, ch) in token.chars().enumerate() {
        let value = ch
            .to_ascii_lowercase()
            .to_digit(36)
            .filter(|v| *v < base * base)
            .ok_or(SeedError::TokenChar(ch))?;
        out[i * 2] = (value / base) as u8;
        out[i * 2 + 1] = (value % base) as u8;
    }
    Ok(out)
}
