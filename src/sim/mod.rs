//! Arena simulation module
//!
//! All match logic lives here. Physics and audio are injected, so this module
//! stays deterministic for a given seed and physics engine:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Collision pairs resolved in the order the engine emitted them
//! - No rendering or platform dependencies

pub mod arena;
pub mod corrective;
pub mod dominance;
pub mod interaction;
pub mod kind;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arena::{Arena, ArenaSnapshot, GameOverHook, ParticleView, WallView};
pub use corrective::{PassReport, SpeedBoost, contain, corrective_pass, enforce_min_speed};
pub use dominance::{DominanceChange, DominanceTracker, dominant_kind, winner};
pub use interaction::{Conversion, resolve_pair};
pub use kind::{Duel, Kind, duel};
pub use spawn::{SpawnCue, SpawnPlan, plan_spawns, release_due, spawn_cues};
pub use state::{ArenaBounds, BodyRegistry, Counts, MatchState, Particle, Wall};
pub use tick::TickReport;
