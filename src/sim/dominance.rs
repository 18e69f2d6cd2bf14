//! Population dominance and the terminal win condition
//!
//! Dominance drives ambience only. Winning needs every other kind wiped out,
//! so a dominant kind is not necessarily a winner.

use super::kind::Kind;
use super::state::Counts;

/// Edge emitted when the dominant kind changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominanceChange {
    Started(Kind),
    Stopped,
}

/// First kind (in fixed order) whose share strictly exceeds `threshold`
pub fn dominant_kind(counts: &Counts, threshold: f32) -> Option<Kind> {
    Kind::ALL
        .into_iter()
        .find(|kind| counts.share(*kind) > threshold)
}

/// Edge detector over the dominant kind
#[derive(Debug, Clone)]
pub struct DominanceTracker {
    threshold: f32,
    last: Option<Kind>,
}

impl DominanceTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    /// Last reported dominant kind
    pub fn current(&self) -> Option<Kind> {
        self.last
    }

    /// Returns a change only when the dominant kind differs from last time
    pub fn update(&mut self, counts: &Counts) -> Option<DominanceChange> {
        let now = dominant_kind(counts, self.threshold);
        if now == self.last {
            return None;
        }
        self.last = now;
        Some(match now {
            Some(kind) => DominanceChange::Started(kind),
            None => DominanceChange::Stopped,
        })
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// The winner, once exactly one kind has members left
pub fn winner(counts: &Counts) -> Option<Kind> {
    counts.sole_survivor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(rock: u32, paper: u32, scissors: u32) -> Counts {
        Counts { rock, paper, scissors }
    }

    #[test]
    fn test_threshold_is_strict() {
        // 70 of 100 is exactly 0.7, not above it
        assert_eq!(dominant_kind(&counts(70, 20, 10), 0.7), None);
        assert_eq!(dominant_kind(&counts(71, 19, 10), 0.7), Some(Kind::Rock));
        assert_eq!(dominant_kind(&counts(5, 5, 90), 0.7), Some(Kind::Scissors));
    }

    #[test]
    fn test_edges_fire_only_on_crossings() {
        let mut tracker = DominanceTracker::new(0.7);
        // up, hold, down, hold, up again
        let sequence = [
            (counts(33, 33, 33), None),
            (counts(60, 20, 19), None),
            (counts(70, 20, 9), Some(DominanceChange::Started(Kind::Rock))),
            (counts(80, 10, 9), None),
            (counts(75, 15, 9), None),
            (counts(69, 21, 9), Some(DominanceChange::Stopped)),
            (counts(50, 40, 9), None),
            (counts(40, 50, 9), None),
            (counts(72, 18, 9), Some(DominanceChange::Started(Kind::Rock))),
            (counts(90, 9, 0), None),
        ];

        for (i, (c, expected)) in sequence.iter().enumerate() {
            assert_eq!(tracker.update(c), *expected, "step {i}: {c:?}");
        }
        assert_eq!(tracker.current(), Some(Kind::Rock));
    }

    #[test]
    fn test_dominant_kind_can_switch() {
        let mut tracker = DominanceTracker::new(0.7);
        tracker.update(&counts(80, 10, 9));
        assert_eq!(
            tracker.update(&counts(9, 80, 10)),
            Some(DominanceChange::Started(Kind::Paper))
        );
        tracker.reset();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_dominant_is_not_winning() {
        let c = counts(95, 4, 0);
        assert_eq!(dominant_kind(&c, 0.7), Some(Kind::Rock));
        assert_eq!(winner(&c), None);
        assert_eq!(winner(&counts(0, 0, 99)), Some(Kind::Scissors));
    }
}
