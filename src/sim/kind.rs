//! Particle kinds and their fixed precedence
//!
//! Rock beats scissors, scissors beats paper, paper beats rock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type label carried by every particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Rock,
    Paper,
    Scissors,
}

impl Kind {
    /// Fixed evaluation order (also the round-robin spawn order)
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    /// Round-robin assignment by spawn index
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 3]
    }

    /// The kind this one converts
    pub fn prey(self) -> Self {
        match self {
            Kind::Rock => Kind::Scissors,
            Kind::Scissors => Kind::Paper,
            Kind::Paper => Kind::Rock,
        }
    }

    pub fn beats(self, other: Kind) -> bool {
        self.prey() == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Rock => "rock",
            Kind::Paper => "paper",
            Kind::Scissors => "scissors",
        }
    }

    /// Capitalized name used when announcing a winner
    pub fn display_name(&self) -> &'static str {
        match self {
            Kind::Rock => "Rock",
            Kind::Paper => "Paper",
            Kind::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of two kinds meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duel {
    /// Same kind, nothing happens
    Draw,
    FirstWins,
    SecondWins,
}

/// Decide a meeting between `a` and `b`
pub fn duel(a: Kind, b: Kind) -> Duel {
    if a == b {
        Duel::Draw
    } else if a.beats(b) {
        Duel::FirstWins
    } else {
        Duel::SecondWins
    }
}
