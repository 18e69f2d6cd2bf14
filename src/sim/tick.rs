//! Fixed timestep arena tick
//!
//! Order per tick: physics step, collision-start queue, boost latch and
//! corrective pass, dominance edge, spawn cues.

use super::arena::Arena;
use super::corrective::{apply_boost, corrective_pass};
use super::dominance::{DominanceChange, winner};
use super::interaction::resolve_pair;
use super::spawn::release_due;
use super::state::MatchState;
use crate::audio::AudioSink;
use crate::physics::{CollisionPair, PhysicsEngine};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub conversions: u32,
    /// Bodies re-launched by the anti-stall rule
    pub stalled: u32,
    /// Bodies teleported back by containment
    pub escaped: u32,
    /// The one-shot speed boost fired this tick
    pub boosted: bool,
    pub dominance: Option<DominanceChange>,
}

impl<P: PhysicsEngine, A: AudioSink> Arena<P, A> {
    /// Advance the match by one fixed step of `dt` seconds.
    ///
    /// Does nothing while paused or after `stop`.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        if !self.active || self.paused {
            return report;
        }
        self.time_ticks += 1;
        self.elapsed += dt;

        self.physics.step();

        for pair in self.physics.drain_collision_starts() {
            if self.state == MatchState::Over {
                break;
            }
            if self.resolve(pair) {
                report.conversions += 1;
            }
        }

        if self.state == MatchState::Running
            && self.boost.poll(self.elapsed, self.tuning.boost_after_secs)
        {
            apply_boost(&mut self.physics, &mut self.registry, &self.tuning);
            log::info!(
                "Speed boost x{} at {:.1}s",
                self.tuning.boost_factor,
                self.elapsed
            );
            report.boosted = true;
        }

        let pass = corrective_pass(
            &mut self.physics,
            &mut self.registry,
            &self.bounds,
            &self.tuning,
            &mut self.rng,
        );
        report.stalled = pass.stalled;
        report.escaped = pass.escaped;

        if self.state == MatchState::Running {
            if let Some(change) = self.dominance.update(&self.counts) {
                match change {
                    DominanceChange::Started(kind) => {
                        log::debug!("{} dominates", kind.display_name());
                        self.audio.start_dominant_ambience(kind);
                    }
                    DominanceChange::Stopped => self.audio.stop_ambience(),
                }
                report.dominance = Some(change);
            }
        }

        for kind in release_due(&mut self.spawn_cues, self.elapsed) {
            self.audio.play_spawn_cue(kind);
        }

        debug_assert_eq!(
            self.counts.total(),
            self.tuning.population,
            "kind counts drifted from population"
        );
        report
    }

    /// Convert one pair and check for a winner; true if a particle flipped
    fn resolve(&mut self, pair: CollisionPair) -> bool {
        let Some(conversion) = resolve_pair(&mut self.registry, &mut self.counts, pair) else {
            return false;
        };
        log::trace!(
            "body {} {} -> {}",
            conversion.body,
            conversion.from,
            conversion.to
        );
        self.audio.play_transform_cue(conversion.from, conversion.to);
        self.check_win();
        true
    }

    /// Fires the game-over hook at most once per match
    fn check_win(&mut self) {
        if self.state != MatchState::Running {
            return;
        }
        let Some(kind) = winner(&self.counts) else {
            return;
        };
        self.state = MatchState::Over;
        self.winner = Some(kind);
        log::info!(
            "Game over: {} wins after {:.1}s",
            kind.display_name(),
            self.elapsed
        );
        if let Some(hook) = self.on_game_over.as_mut() {
            hook(kind);
        }
    }
}
