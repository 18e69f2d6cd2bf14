//! Frame scheduling
//!
//! Hosts call [`Runner::frame`] once per display frame with a millisecond
//! timestamp. Elapsed wall time is banked and spent in fixed `SIM_DT` ticks.

use crate::audio::AudioSink;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ArenaError;
use crate::physics::PhysicsEngine;
use crate::sim::{Arena, TickReport};

/// Longest frame gap honoured, in seconds (tab switches, debugger stops)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Runner<P: PhysicsEngine, A: AudioSink> {
    arena: Arena<P, A>,
    accumulator: f32,
    last_time: Option<f64>,
    scheduled: bool,
}

impl<P: PhysicsEngine, A: AudioSink> Runner<P, A> {
    pub fn new(arena: Arena<P, A>) -> Self {
        Self {
            arena,
            accumulator: 0.0,
            last_time: None,
            scheduled: true,
        }
    }

    /// Run the ticks owed since the previous frame.
    ///
    /// Returns whether the host should schedule another frame. The first
    /// frame only records the timestamp.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.scheduled {
            return false;
        }

        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let report = self.arena.tick(SIM_DT);
            self.log_report(&report);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        true
    }

    fn log_report(&self, report: &TickReport) {
        if report.escaped > 0 {
            log::debug!("{} particles pulled back inside", report.escaped);
        }
    }

    /// Unschedule frames and stop the match. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.scheduled {
            self.scheduled = false;
            self.accumulator = 0.0;
        }
        self.arena.stop();
    }

    /// New match on the same arena; frames are scheduled again
    pub fn restart(&mut self, seed: u64) -> Result<(), ArenaError> {
        self.arena.restart(seed)?;
        self.accumulator = 0.0;
        self.last_time = None;
        self.scheduled = true;
        Ok(())
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn arena(&self) -> &Arena<P, A> {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena<P, A> {
        &mut self.arena
    }
}
