//! Seeded random source
//!
//! All randomness in a session flows through one `SeedRng`, so a whole
//! session replays bit-for-bit from its 32-bit seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic uniform generator
///
/// Backed by PCG32 seeded through `seed_from_u64`. A seed therefore does not
/// reproduce the browser game's mulberry32 pendulums for the same `?seed=`.
#[derive(Debug, Clone)]
pub struct SeedRng {
    seed: u32,
    rng: Pcg32,
}

impl SeedRng {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(u64::from(seed)),
        }
    }

    /// Seed taken from the wall clock
    pub fn from_clock() -> Self {
        Self::new(time_seed())
    }

    /// Restart the stream from `seed`
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform in [min, max]
    #[inline]
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_unit()
    }
}

/// Wall-clock milliseconds truncated to 32 bits
pub fn time_seed() -> u32 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    millis as u32
}

/// Parse an externally supplied seed.
///
/// Leading sign and decimal digits are read, anything after them is ignored,
/// and the value wraps into `u32`. Missing or unreadable input falls back to
/// [`time_seed`].
pub fn parse_seed(raw: Option<&str>) -> u32 {
    match raw.and_then(parse_leading_int) {
        Some(value) => value as u32,
        None => {
            let seed = time_seed();
            if let Some(raw) = raw {
                log::warn!("Ignoring unreadable seed {:?}, using clock seed {}", raw, seed);
            }
            seed
        }
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
