//! Transient "juice": screen shake, hit-stop and floating damage numbers
//!
//! Nothing here feeds back into gameplay except the freeze counter, which
//! pauses simulation while it runs down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A floating damage number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageIndicator {
    pub pos: Vec2,
    pub value: i32,
    pub critical: bool,
    /// Seconds left
    pub life: f32,
}

impl DamageIndicator {
    /// Remaining lifetime in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        (self.life / DAMAGE_INDICATOR_LIFE).clamp(0.0, 1.0)
    }
}

/// A combined shake + freeze burst; each channel only ever raises the current value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub ambient: f32,
    pub impact: f32,
    pub freeze: u32,
}

impl Pulse {
    pub const ELITE_SPAWN: Pulse = Pulse {
        ambient: 8.0,
        impact: 0.0,
        freeze: 6,
    };
    pub const ELITE_REWARD: Pulse = Pulse {
        ambient: 6.0,
        impact: 10.0,
        freeze: 4,
    };
    /// Larger than any other pulse so unlocks read distinctly
    pub const SYNERGY: Pulse = Pulse {
        ambient: 12.0,
        impact: 0.0,
        freeze: 8,
    };
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feedback {
    pub ambient_shake: f32,
    pub impact_shake: f32,
    /// Frames of hit-stop left
    pub freeze_frames: u32,
    /// Oldest first
    pub indicators: Vec<DamageIndicator>,
}

impl Feedback {
    pub fn raise_ambient(&mut self, floor: f32) {
        self.ambient_shake = self.ambient_shake.max(floor);
    }

    /// Add impact shake up to `cap`; a larger pulse already running is kept
    pub fn add_impact(&mut self, amount: f32, cap: f32) {
        if self.impact_shake < cap {
            self.impact_shake = (self.impact_shake + amount).min(cap);
        }
    }

    pub fn hit_stop(&mut self, frames: u32) {
        self.freeze_frames = self.freeze_frames.max(frames);
    }

    pub fn pulse(&mut self, pulse: Pulse) {
        self.raise_ambient(pulse.ambient);
        self.impact_shake = self.impact_shake.max(pulse.impact);
        self.hit_stop(pulse.freeze);
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_frames > 0
    }

    /// Consume one hit-stop frame; only ambient shake keeps decaying
    pub fn tick_frozen(&mut self) {
        self.freeze_frames = self.freeze_frames.saturating_sub(1);
        self.ambient_shake *= FROZEN_SHAKE_DECAY;
    }

    /// Per-frame geometric decay
    pub fn decay(&mut self) {
        self.ambient_shake *= AMBIENT_SHAKE_DECAY;
        self.impact_shake *= IMPACT_SHAKE_DECAY;
        if self.ambient_shake < 0.01 {
            self.ambient_shake = 0.0;
        }
        if self.impact_shake < 0.01 {
            self.impact_shake = 0.0;
        }
    }

    pub fn push_indicator(&mut self, pos: Vec2, value: i32, critical: bool) {
        self.indicators.push(DamageIndicator {
            pos,
            value,
            critical,
            life: DAMAGE_INDICATOR_LIFE,
        });
    }

    /// Float indicators upward and drop expired ones
    pub fn advance_indicators(&mut self, dt: f32) {
        for ind in &mut self.indicators {
            ind.pos.y -= DAMAGE_INDICATOR_RISE * dt;
            ind.life -= dt;
        }
        self.indicators.retain(|ind| ind.life > 0.0);
    }

    /// Combined magnitude for the camera offset
    pub fn total_shake(&self) -> f32 {
        self.ambient_shake + self.impact_shake
    }
}
