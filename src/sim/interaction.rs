//! Pairwise kind conversion
//!
//! Kinds are read from the registry at the moment a pair is resolved, so a
//! particle relabeled earlier in the same batch fights with its new kind.

use super::kind::{Duel, Kind, duel};
use super::state::{BodyRegistry, Counts};
use crate::physics::{BodyHandle, CollisionPair};

/// A particle that changed sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub body: BodyHandle,
    pub from: Kind,
    pub to: Kind,
}

/// Resolve one collision-start pair.
///
/// Returns `None` when either body is a wall (or unknown) or both share a
/// kind. Otherwise the loser is relabeled and `counts` updated in the same
/// step.
pub fn resolve_pair(
    registry: &mut BodyRegistry,
    counts: &mut Counts,
    pair: CollisionPair,
) -> Option<Conversion> {
    let kind_a = registry.particle(pair.a)?.kind;
    let kind_b = registry.particle(pair.b)?.kind;

    let (loser, winner_kind) = match duel(kind_a, kind_b) {
        Duel::Draw => return None,
        Duel::FirstWins => (pair.b, kind_a),
        Duel::SecondWins => (pair.a, kind_b),
    };

    let particle = registry.particle_mut(loser)?;
    let from = particle.kind;
    particle.kind = winner_kind;
    counts.transfer(from, winner_kind);

    Some(Conversion {
        body: loser,
        from,
        to: winner_kind,
    })
}
