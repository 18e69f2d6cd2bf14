//! Initial particle placement and staggered spawn cues

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::kind::Kind;
use super::state::ArenaBounds;
use crate::random_direction;
use crate::tuning::Tuning;

/// Where and how one particle enters the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub kind: Kind,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A spawn sound waiting for its due time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCue {
    /// Match time (seconds) at which the cue plays
    pub due: f32,
    pub kind: Kind,
}

/// Lay out the full population: round-robin kinds, uniform positions inside
/// the padded arena, random headings at launch speed
pub fn plan_spawns<R: Rng>(tuning: &Tuning, bounds: &ArenaBounds, rng: &mut R) -> Vec<SpawnPlan> {
    let pad = tuning.spawn_padding;
    let span = (bounds.size - pad * 2.0).max(0.0);

    (0..tuning.population as usize)
        .map(|i| {
            let position = Vec2::new(
                bounds.origin.x + pad + rng.random::<f32>() * span,
                bounds.origin.y + pad + rng.random::<f32>() * span,
            );
            SpawnPlan {
                kind: Kind::from_index(i),
                position,
                velocity: random_direction(rng, tuning.launch_speed),
            }
        })
        .collect()
}

/// Every Nth spawn gets a cue, delayed by its index
pub fn spawn_cues(tuning: &Tuning, plans: &[SpawnPlan], start: f32) -> VecDeque<SpawnCue> {
    let every = tuning.spawn_cue_every.max(1) as usize;
    plans
        .iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0)
        .map(|(i, plan)| SpawnCue {
            due: start + i as f32 * tuning.spawn_cue_stagger_ms / 1000.0,
            kind: plan.kind,
        })
        .collect()
}

/// Pop every cue whose due time has passed
pub fn release_due(queue: &mut VecDeque<SpawnCue>, now: f32) -> Vec<Kind> {
    let mut due = Vec::new();
    while let Some(cue) = queue.front() {
        if cue.due > now {
            break;
        }
        due.push(cue.kind);
        queue.pop_front();
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Tuning, ArenaBounds) {
        (Tuning::default(), ArenaBounds::new(Vec2::new(50.0, 50.0), 500.0))
    }

    #[test]
    fn test_even_split_and_padding() {
        let (tuning, bounds) = setup();
        let mut rng = Pcg32::seed_from_u64(42);
        let plans = plan_spawns(&tuning, &bounds, &mut rng);

        assert_eq!(plans.len(), 99);
        for kind in Kind::ALL {
            assert_eq!(plans.iter().filter(|p| p.kind == kind).count(), 33);
        }

        let inner = bounds.rect().expand(-tuning.spawn_padding);
        for plan in &plans {
            assert!(inner.contains(plan.position), "{:?}", plan.position);
            assert!((plan.velocity.length() - tuning.launch_speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let (tuning, bounds) = setup();
        let a = plan_spawns(&tuning, &bounds, &mut Pcg32::seed_from_u64(9));
        let b = plan_spawns(&tuning, &bounds, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cues_are_sparse_and_staggered() {
        let (tuning, bounds) = setup();
        let plans = plan_spawns(&tuning, &bounds, &mut Pcg32::seed_from_u64(1));
        let cues = spawn_cues(&tuning, &plans, 0.0);

        // Indices 0, 10, ..., 90
        assert_eq!(cues.len(), 10);
        assert_eq!(cues[0].due, 0.0);
        assert!((cues[9].due - 0.45).abs() < 1e-6);
        assert_eq!(cues[1].kind, Kind::from_index(10));
    }

    #[test]
    fn test_release_due_pops_in_order() {
        let mut queue: VecDeque<SpawnCue> = [
            SpawnCue { due: 0.0, kind: Kind::Rock },
            SpawnCue { due: 0.05, kind: Kind::Paper },
            SpawnCue { due: 0.1, kind: Kind::Scissors },
        ]
        .into_iter()
        .collect();

        assert_eq!(release_due(&mut queue, 0.0), vec![Kind::Rock]);
        assert!(release_due(&mut queue, 0.01).is_empty());
        assert_eq!(release_due(&mut queue, 1.0), vec![Kind::Paper, Kind::Scissors]);
        assert!(queue.is_empty());
    }
}
