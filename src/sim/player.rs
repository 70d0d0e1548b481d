//! The player-side actor: movement, firing and upgrade stats

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression::{
    AppliedUpgrade, Ledger, MilestoneKind, MilestoneUpgrade, Synergy, UpgradeCategory,
};
use super::projectile::{Owner, Projectile, ProjectileKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Shots between overheat blasts
const OVERHEAT_EVERY: u32 = 8;

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Shots per second
    pub fire_rate: i32,
    pub base_damage: i32,
    /// Seconds until the next volley may fire
    pub shoot_cooldown: f32,
    pub shots_fired: u32,
    /// Held horizontal velocity (px/s, signed)
    pub move_dx: f32,
    /// Extra volley width from milestone upgrades
    pub bonus_spread: u32,
    pub ledger: Ledger,
    pub applied_upgrades: Vec<AppliedUpgrade>,
    speed: f32,
}

/// Stat change and unlocks produced by a ledger grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub category: UpgradeCategory,
    pub unlocked: Vec<Synergy>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.width * 0.5, tuning.height - PLAYER_BOTTOM_MARGIN),
            health: tuning.player_health,
            max_health: tuning.player_health,
            fire_rate: tuning.fire_rate.max(1),
            base_damage: tuning.base_damage,
            shoot_cooldown: 0.0,
            shots_fired: 0,
            move_dx: 0.0,
            bonus_spread: 0,
            ledger: Ledger::new(),
            applied_upgrades: Vec::new(),
            speed: tuning.player_speed,
        }
    }

    /// Set the held movement intent (-1 = full left, +1 = full right)
    pub fn move_intent(&mut self, direction: f32) {
        self.move_dx = direction.clamp(-1.0, 1.0) * self.speed;
    }

    pub fn update(&mut self, dt: f32, width: f32) {
        self.pos.x = (self.pos.x + self.move_dx * dt).clamp(0.0, width);
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Fire a volley if the cooldown allows.
    ///
    /// Returns the shots to admit; an empty vec means the cooldown is running.
    /// Every 8th volley with overheat unlocked also carries a plasma fan.
    pub fn try_fire(&mut self) -> Vec<Projectile> {
        if self.shoot_cooldown > 0.0 {
            return Vec::new();
        }
        self.shoot_cooldown = 1.0 / self.fire_rate.max(1) as f32;
        self.shots_fired += 1;

        let pierce = self.ledger.count(UpgradeCategory::Pierce);
        let spread = self.ledger.count(UpgradeCategory::Spread);
        let count = (if spread > 0 { spread + 1 } else { 1 }) + self.bonus_spread;
        let up = -std::f32::consts::FRAC_PI_2;

        let kind = if count > 1 {
            ProjectileKind::Spread
        } else {
            ProjectileKind::Laser
        };
        let center = (count / 2) as f32;
        let mut shots: Vec<Projectile> = (0..count)
            .map(|i| {
                let angle = up + (i as f32 - center) * SPREAD_ANGLE_STEP;
                Projectile::toward(self.pos, angle, SHOT_SPEED, self.base_damage, Owner::Player, kind)
                    .with_pierce(pierce)
            })
            .collect();

        if self.ledger.has(Synergy::Overheat) && self.shots_fired % OVERHEAT_EVERY == 0 {
            shots.extend(self.overheat_blast());
        }
        shots
    }

    /// Five weaving plasma shots fanned around vertical
    pub fn overheat_blast(&self) -> Vec<Projectile> {
        let up = -std::f32::consts::FRAC_PI_2;
        (-2..=2)
            .map(|i| {
                Projectile::toward(
                    self.pos,
                    up + i as f32 * 0.3,
                    SHOT_SPEED * 0.6,
                    self.base_damage,
                    Owner::Player,
                    ProjectileKind::Plasma,
                )
            })
            .collect()
    }

    /// Count an upgrade in the ledger and apply its stat delta
    pub fn grant(&mut self, category: UpgradeCategory) -> Grant {
        let unlocked = self.ledger.add(category);
        match category {
            UpgradeCategory::Damage => self.base_damage += DAMAGE_UPGRADE_BONUS,
            UpgradeCategory::FireRate => self.fire_rate += FIRE_RATE_UPGRADE_BONUS,
            // Read straight from the ledger when firing
            UpgradeCategory::Spread | UpgradeCategory::Pierce => {}
            UpgradeCategory::Crit | UpgradeCategory::Status => {}
        }
        Grant { category, unlocked }
    }

    /// Apply a milestone upgrade; does not touch the ledger
    pub fn apply_milestone(&mut self, upgrade: &MilestoneUpgrade, wave: u32) {
        match upgrade.kind {
            MilestoneKind::SpreadShot => self.bonus_spread += upgrade.value.max(0) as u32,
            MilestoneKind::FireRate => self.fire_rate += upgrade.value,
        }
        self.fire_rate = self.fire_rate.max(1);
        self.applied_upgrades.push(AppliedUpgrade {
            kind: upgrade.kind,
            value: upgrade.value,
            wave,
        });
    }

    pub fn total_upgrades(&self) -> u32 {
        self.ledger.total()
    }
}
