//! Round scoring
//!
//! Fewer marked cells means a bigger payout: a single cell is worth the
//! maximum, marking the whole grid is worth the minimum.

use crate::consts::{MAX_SCORE, MIN_SCORE};

/// Points for a hit with `selected` cells marked out of `total` cells
pub fn score(selected: u32, total: u32) -> u32 {
    if selected < 1 || total <= 1 {
        return 0;
    }
    let t = total as f64;
    let ratio = (t - selected as f64) / (t - 1.0);
    let raw = (1.0 + 9999.0 * ratio * ratio).floor();
    raw.clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(score(0, 400), 0);
        assert_eq!(score(0, 0), 0);
        assert_eq!(score(1, 1), 0);
        assert_eq!(score(5, 1), 0);
        assert_eq!(score(1, 400), 10_000);
        assert_eq!(score(400, 400), 1);
    }

    #[test]
    fn test_more_cells_than_grid_clamps() {
        // ratio goes negative, its square grows again; the clamp keeps it in range
        assert!(score(2000, 400) <= MAX_SCORE);
        assert!(score(2000, 400) >= MIN_SCORE);
    }

    #[test]
    fn test_ten_of_640() {
        let ratio = 630.0f64 / 639.0;
        let expected = (1.0 + 9999.0 * ratio * ratio).floor() as u32;
        assert_eq!(score(10, 640), expected);
        assert_eq!(expected, 9720);
    }

    proptest! {
        #[test]
        fn prop_monotone_in_selection(total in 2u32..2000, a in 1u32..2000, b in 1u32..2000) {
            let (k1, k2) = (a.min(b).min(total), a.max(b).min(total));
            prop_assert!(score(k1, total) >= score(k2, total));
        }

        #[test]
        fn prop_in_range(total in 2u32..2000, k in 1u32..2000) {
            let k = k.min(total);
            let s = score(k, total);
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&s));
        }
    }
}
