//! Vertical Shmup - simulation core for a vertically-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (pools, spawning, collisions, waves, upgrades)
//! - `tuning`: Data-driven configuration
//! - `view`: Read-only snapshot consumed by renderers

pub mod sim;
pub mod tuning;
pub mod view;

pub use sim::{FrameInput, Simulation};
pub use tuning::Tuning;
pub use view::SimView;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest step the core will integrate in one update (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Critical hit roll
    pub const CRIT_CHANCE: f64 = 0.12;
    pub const CRIT_MULTIPLIER: f32 = 1.8;
    /// Hit-flash duration after taking damage (seconds)
    pub const HIT_FLASH_DURATION: f32 = 0.12;

    /// Antagonist defaults
    pub const ANTAGONIST_RADIUS: f32 = 20.0;
    pub const ANTAGONIST_BASE_HEALTH: i32 = 30;
    pub const ANTAGONIST_HEALTH_PER_WAVE: i32 = 5;
    pub const ANTAGONIST_BASE_SPEED: f32 = 80.0;
    pub const ANTAGONIST_SPEED_PER_WAVE: f32 = 5.0;
    /// Vertical gap between queued spawns so they enter one after another
    pub const SPAWN_STAGGER: f32 = 90.0;

    /// Wave pacing: 5 + 2 * wave entries, one every half second
    pub const WAVE_BASE_SPAWNS: u32 = 5;
    pub const WAVE_SPAWNS_PER_WAVE: u32 = 2;
    pub const WAVE_SPAWN_INTERVAL: f32 = 0.5;
    /// Horizontal offset range around the center lane
    pub const SPAWN_OFFSET_RANGE: f32 = 30.0;
    /// Every Nth wave grants a milestone upgrade
    pub const MILESTONE_WAVE_INTERVAL: u32 = 3;

    /// Elite defaults
    pub const FIRST_ELITE_AT: u32 = 12;
    pub const ELITE_BASE_INTERVAL: u32 = 10;
    /// Inclusive jitter added on top of the base interval (10-15 kills)
    pub const ELITE_INTERVAL_JITTER: u32 = 5;
    pub const ELITE_BASE_HEALTH: i32 = 120;
    pub const ELITE_HEALTH_PER_WAVE: i32 = 15;
    pub const ELITE_HEALTH_PER_UPGRADE: i32 = 12;
    pub const ELITE_SPEED: f32 = 60.0;
    pub const ELITE_SPAWN_Y: f32 = -80.0;

    /// Player shots
    pub const SHOT_SPEED: f32 = 900.0;
    pub const SPREAD_ANGLE_STEP: f32 = 0.15;
    pub const PLAYER_HALF_EXTENT: f32 = 10.0;
    /// Distance from the bottom edge the player flies at
    pub const PLAYER_BOTTOM_MARGIN: f32 = 50.0;
    pub const DAMAGE_UPGRADE_BONUS: i32 = 2;
    pub const FIRE_RATE_UPGRADE_BONUS: i32 = 2;

    /// Projectiles further than this outside the playfield are culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 10.0;
    /// Speeds below this are treated as a degenerate launch
    pub const MIN_PROJECTILE_SPEED: f32 = 0.0001;
    /// Plasma weave: amplitude (radians) and phase rate (radians/sec)
    pub const PLASMA_WEAVE_AMPLITUDE: f32 = 0.08;
    pub const PLASMA_WEAVE_RATE: f32 = 8.0;

    /// Broad-phase vertical window for the collision sweep
    pub const SWEEP_WINDOW: f32 = 30.0;
    /// Execute synergy threshold (fraction of max health)
    pub const EXECUTE_THRESHOLD: f32 = 0.2;
    /// Shatter: diagonal fragments per kill and their speed
    pub const SHATTER_FRAGMENTS: u32 = 4;
    pub const SHATTER_FRAGMENT_SPEED: f32 = 600.0;

    /// Feedback tuning
    pub const AMBIENT_SHAKE_DECAY: f32 = 0.9;
    pub const IMPACT_SHAKE_DECAY: f32 = 0.85;
    /// Ambient decay applied on hit-stopped frames
    pub const FROZEN_SHAKE_DECAY: f32 = 0.85;
    pub const HIT_SHAKE_FLOOR: f32 = 1.5;
    pub const KILL_SHAKE_FLOOR: f32 = 3.0;
    pub const HIT_STOP_FRAMES: u32 = 3;
    pub const CRIT_IMPACT_STEP: f32 = 2.0;
    pub const IMPACT_SHAKE_CAP: f32 = 4.0;
    pub const EXECUTE_IMPACT_STEP: f32 = 3.0;
    /// Impact shake when the player is hit
    pub const PLAYER_HIT_IMPACT: f32 = 2.0;
    pub const DAMAGE_INDICATOR_LIFE: f32 = 0.8;
    pub const DAMAGE_INDICATOR_RISE: f32 = 40.0;
}

/// Unit vector for a heading angle (radians, screen space: +y is down)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Axis-aligned overlap between two points with a shared half extent
#[inline]
pub fn aabb_overlap(a: Vec2, b: Vec2, half_extent: f32) -> bool {
    let d = a - b;
    d.x > -half_extent && d.x < half_extent && d.y > -half_extent && d.y < half_extent
}
