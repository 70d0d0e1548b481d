//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. Each [`Simulation`] owns its pools, ledger,
//! spawn queue, feedback signals and RNG:
//! - Clamped per-frame `dt`
//! - Seeded RNG only
//! - No rendering, input or platform dependencies

pub mod antagonist;
pub mod collision;
pub mod feedback;
pub mod player;
pub mod pool;
pub mod progression;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;

pub use antagonist::{Antagonist, AntagonistKind, DamageEvent, MotionPattern};
pub use collision::{WindowSweep, projectile_hits};
pub use feedback::{DamageIndicator, Feedback, Pulse};
pub use player::{Grant, Player};
pub use pool::{EntityPool, Pooled};
pub use progression::{
    AppliedUpgrade, Ledger, MILESTONE_UPGRADES, MilestoneKind, MilestoneUpgrade, Synergy,
    SynergyFlags, UpgradeCategory,
};
pub use projectile::{Motion, Owner, Projectile, ProjectileKind};
pub use spawn::{ScheduledSpawn, SpawnQueue, wave_size};
pub use state::{SimEvent, Simulation};
pub use tick::{FrameInput, tick};
