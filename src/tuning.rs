//! Data-driven configuration
//!
//! Values a bootstrapper may choose per run. Every field has a default, so a
//! JSON document only needs the keys it wants to override. Fixed gameplay
//! formulas live in [`crate::consts`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,

    /// RNG seed for crits, spawn rolls and rewards
    pub seed: u64,

    // === Pools ===
    pub projectile_capacity: usize,
    pub antagonist_capacity: usize,

    // === Player ===
    /// Horizontal speed at full intent (px/s)
    pub player_speed: f32,
    pub player_health: i32,
    pub base_damage: i32,
    /// Volleys per second
    pub fire_rate: i32,
    /// Health lost when an antagonist rams the player
    pub contact_damage: i32,

    // === Elites ===
    /// Seconds between an elite's hostile shots
    pub elite_fire_interval: f32,
    pub hostile_shot_speed: f32,
    pub hostile_shot_damage: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            seed: 0x5eed,

            projectile_capacity: 100,
            antagonist_capacity: 50,

            player_speed: 300.0,
            player_health: 100,
            base_damage: 10,
            fire_rate: 10,
            contact_damage: 10,

            elite_fire_interval: 1.5,
            hostile_shot_speed: 300.0,
            hostile_shot_damage: 5,
        }
    }
}

impl Tuning {
    /// Default tuning on a custom playfield
    pub fn with_playfield(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would make the simulation meaningless
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.max(1.0);
        self.height = self.height.max(1.0);
        self.fire_rate = self.fire_rate.max(1);
        self.player_health = self.player_health.max(1);
        self.base_damage = self.base_damage.max(0);
        self.elite_fire_interval = self.elite_fire_interval.max(0.05);
        self
    }
}
