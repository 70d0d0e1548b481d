//! Hostile entities descending the playfield

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::Pooled;
use crate::consts::*;

/// Visual/color class; also decides score weight and motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AntagonistKind {
    #[default]
    Scout,
    Weaver,
    Brute,
}

impl AntagonistKind {
    pub const ALL: [AntagonistKind; 3] = [
        AntagonistKind::Scout,
        AntagonistKind::Weaver,
        AntagonistKind::Brute,
    ];

    /// Score awarded for a kill
    pub fn score(self) -> u64 {
        match self {
            AntagonistKind::Scout => 10,
            AntagonistKind::Weaver => 20,
            AntagonistKind::Brute => 50,
        }
    }

    pub fn pattern(self) -> MotionPattern {
        match self {
            AntagonistKind::Scout => MotionPattern::Straight,
            AntagonistKind::Weaver => MotionPattern::Wavy,
            AntagonistKind::Brute => MotionPattern::Heavy,
        }
    }
}

/// Per-frame movement rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPattern {
    /// Pure vertical descent
    #[default]
    Straight,
    /// Descent plus a sideways sway keyed on height
    Wavy,
    /// Descent at 80% speed
    Heavy,
}

/// Result of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    /// Health actually removed before clamping (what the indicator shows)
    pub amount: i32,
    pub critical: bool,
}

/// A pooled antagonist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Antagonist {
    pub pos: Vec2,
    /// Position last frame (trail rendering)
    pub prev_pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub kind: AntagonistKind,
    pub pattern: MotionPattern,
    pub speed: f32,
    /// Collision half-extent and render size
    pub radius: f32,
    /// Remaining hit-flash time (seconds)
    pub hit_flash: f32,
    pub elite: bool,
    pub pulse_phase: f32,
    /// Seconds until an elite's next hostile shot
    pub fire_timer: f32,
    pub active: bool,
}

impl Default for Antagonist {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            prev_pos: Vec2::ZERO,
            health: 0,
            max_health: 0,
            kind: AntagonistKind::default(),
            pattern: MotionPattern::default(),
            speed: 0.0,
            radius: ANTAGONIST_RADIUS,
            hit_flash: 0.0,
            elite: false,
            pulse_phase: 0.0,
            fire_timer: 0.0,
            active: false,
        }
    }
}

impl Pooled for Antagonist {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Antagonist {
    /// Reinitialise a recycled slot as a regular antagonist
    pub fn reset(&mut self, pos: Vec2, health: i32, speed: f32, kind: AntagonistKind) {
        *self = Self {
            pos,
            prev_pos: pos,
            health: health.max(1),
            max_health: health.max(1),
            kind,
            pattern: kind.pattern(),
            speed,
            active: self.active,
            ..Self::default()
        };
    }

    pub fn update(&mut self, dt: f32) {
        self.prev_pos = self.pos;

        match self.pattern {
            MotionPattern::Straight => {
                self.pos.y += self.speed * dt;
            }
            MotionPattern::Wavy => {
                self.pos.y += self.speed * dt;
                self.pos.x += (self.pos.y * 0.03).sin() * 40.0 * dt;
            }
            MotionPattern::Heavy => {
                self.pos.y += self.speed * dt * 0.8;
            }
        }

        self.pulse_phase += dt * 6.0;
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    /// Apply a hit, rolling for a critical.
    ///
    /// Health is clamped at zero and the hit flash restarts.
    pub fn take_damage(&mut self, base: i32, rng: &mut impl Rng) -> DamageEvent {
        let critical = rng.random_bool(CRIT_CHANCE);
        let amount = if critical {
            (base as f32 * CRIT_MULTIPLIER) as i32
        } else {
            base
        };

        self.health = (self.health - amount).max(0);
        self.hit_flash = HIT_FLASH_DURATION;

        DamageEvent { amount, critical }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Fully below the playfield
    pub fn escaped(&self, height: f32) -> bool {
        self.pos.y > height + self.radius
    }

    /// Health in [0, 1]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Hit flash in [0, 1] (1 = just hit)
    pub fn flash_ratio(&self) -> f32 {
        (self.hit_flash / HIT_FLASH_DURATION).clamp(0.0, 1.0)
    }

    /// Under the execute threshold
    pub fn executable(&self) -> bool {
        (self.health as f32) < self.max_health as f32 * EXECUTE_THRESHOLD
    }
}
