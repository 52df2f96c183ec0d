//! Score count-up for the result screen
//!
//! Purely cosmetic. The round's score is final the instant the round ends;
//! this only decides what number to show while it "rolls up".

/// Displayed score `elapsed` seconds into a reveal lasting `duration`.
///
/// Cubic ease-out from 0 to `final_score`; exact once the reveal is over.
pub fn revealed_score(final_score: u32, elapsed: f64, duration: f64) -> u32 {
    if duration <= 0.0 {
        return final_score;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0);
    if t >= 1.0 {
        return final_score;
    }
    let eased = 1.0 - (1.0 - t).powi(3);
    (final_score as f64 * eased).floor() as u32
}

/// Tracks a reveal in progress against a host clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReveal {
    pub final_score: u32,
    pub duration: f64,
    elapsed: f64,
}

impl ScoreReveal {
    pub fn new(final_score: u32) -> Self {
        Self {
            final_score,
            duration: crate::consts::SCORE_REVEAL_DURATION,
            elapsed: 0.0,
        }
    }

    /// Advance by a frame and return the number to display
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        self.elapsed += frame_dt.max(0.0);
        self.current()
    }

    pub fn current(&self) -> u32 {
        revealed_score(self.final_score, self.elapsed, self.duration)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(revealed_score(9720, 0.0, 0.78), 0);
        assert_eq!(revealed_score(9720, 0.78, 0.78), 9720);
        assert_eq!(revealed_score(9720, 10.0, 0.78), 9720);
        assert_eq!(revealed_score(9720, -1.0, 0.78), 0);
        assert_eq!(revealed_score(9720, 0.1, 0.0), 9720);
    }

    #[test]
    fn test_ease_out_front_loads() {
        // Halfway through time, 87.5% of the way there
        assert_eq!(revealed_score(10_000, 0.5, 1.0), 8750);
        let mut last = 0;
        for i in 0..=100 {
            let v = revealed_score(10_000, i as f64 / 100.0, 1.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_reveal_tracker() {
        let mut reveal = ScoreReveal::new(500);
        assert_eq!(reveal.current(), 0);
        assert!(!reveal.is_done());
        let mid = reveal.advance(0.3);
        assert!(mid > 0 && mid < 500);
        assert_eq!(reveal.advance(1.0), 500);
        assert!(reveal.is_done());
    }
}
