//! Projectiles fired by the player or by hostile antagonists

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::Pooled;
use crate::consts::*;
use crate::heading;

/// Who fired the projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Hostile,
}

/// Visual/behavioral projectile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Single forward shot
    #[default]
    Laser,
    /// Fanned volley shot and shatter fragment
    Spread,
    /// Weaving overheat shot
    Plasma,
}

/// How a projectile moves each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Linear,
    Oscillating,
}

impl ProjectileKind {
    pub fn motion(self) -> Motion {
        match self {
            ProjectileKind::Plasma => Motion::Oscillating,
            ProjectileKind::Laser | ProjectileKind::Spread => Motion::Linear,
        }
    }
}

/// A pooled projectile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    /// Antagonists this projectile may still pass through
    pub pierce: u32,
    pub owner: Owner,
    pub kind: ProjectileKind,
    /// Live in its pool
    pub active: bool,
    /// Consumed this frame; released at frame end
    pub to_destroy: bool,
    /// Launch speed (magnitude preserved while weaving)
    speed: f32,
    /// Launch heading (radians)
    base_angle: f32,
    /// Weave phase accumulator
    phase: f32,
}

impl Pooled for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Projectile {
    /// Build a projectile. A near-zero velocity yields an inactive projectile
    /// that must not be admitted to the pool.
    pub fn new(pos: Vec2, vel: Vec2, damage: i32, owner: Owner, kind: ProjectileKind) -> Self {
        let speed = vel.length();
        let mut projectile = Self {
            pos,
            vel,
            damage: damage.max(0),
            pierce: 0,
            owner,
            kind,
            active: false,
            to_destroy: false,
            speed: 0.0,
            base_angle: 0.0,
            phase: 0.0,
        };
        if speed < MIN_PROJECTILE_SPEED {
            return projectile;
        }
        projectile.speed = speed;
        projectile.base_angle = vel.y.atan2(vel.x);
        projectile.active = true;
        projectile
    }

    /// Convenience for a shot along a heading angle
    pub fn toward(
        pos: Vec2,
        angle: f32,
        speed: f32,
        damage: i32,
        owner: Owner,
        kind: ProjectileKind,
    ) -> Self {
        Self::new(pos, heading(angle) * speed, damage, owner, kind)
    }

    pub fn with_pierce(mut self, pierce: u32) -> Self {
        self.pierce = pierce;
        self
    }

    /// False for a degenerate launch
    pub fn is_launchable(&self) -> bool {
        self.active
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn update(&mut self, dt: f32) {
        if self.kind.motion() == Motion::Oscillating {
            let weave = self.phase.sin() * PLASMA_WEAVE_AMPLITUDE;
            self.vel = heading(self.base_angle + weave) * self.speed;
            self.phase += dt * PLASMA_WEAVE_RATE;
        }
        self.pos += self.vel * dt;
    }

    /// Outside the playfield by more than the cull margin
    pub fn out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x < -PROJECTILE_CULL_MARGIN
            || self.pos.x > width + PROJECTILE_CULL_MARGIN
            || self.pos.y < -PROJECTILE_CULL_MARGIN
            || self.pos.y > height + PROJECTILE_CULL_MARGIN
    }

    /// Can still hit something this frame
    pub fn is_live(&self) -> bool {
        self.active && !self.to_destroy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_velocity_is_rejected() {
        let p = Projectile::new(Vec2::ZERO, Vec2::ZERO, 10, Owner::Player, ProjectileKind::Laser);
        assert!(!p.is_launchable());

        let p = Projectile::new(
            Vec2::ZERO,
            Vec2::new(0.00001, 0.0),
            10,
            Owner::Player,
            ProjectileKind::Laser,
        );
        assert!(!p.is_launchable());
    }

    #[test]
    fn test_linear_motion() {
        let mut p = Projectile::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, -900.0),
            10,
            Owner::Player,
            ProjectileKind::Laser,
        );
        p.update(0.01);
        assert!((p.pos.y - 91.0).abs() < 0.001);
        assert!((p.pos.x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_plasma_weave_preserves_speed() {
        let mut p = Projectile::toward(
            Vec2::ZERO,
            -std::f32::consts::FRAC_PI_2,
            500.0,
            5,
            Owner::Player,
            ProjectileKind::Plasma,
        );
        let mut max_dev: f32 = 0.0;
        for _ in 0..60 {
            p.update(1.0 / 60.0);
            assert!((p.vel.length() - 500.0).abs() < 0.01);
            let angle = p.vel.y.atan2(p.vel.x);
            max_dev = max_dev.max((angle + std::f32::consts::FRAC_PI_2).abs());
        }
        assert!(max_dev > 0.01, "plasma should weave");
        assert!(max_dev <= PLASMA_WEAVE_AMPLITUDE + 0.0001);
        assert!(p.phase() > 7.9);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut p = Projectile::new(
            Vec2::new(5.0, -5.0),
            Vec2::new(0.0, -1.0),
            1,
            Owner::Player,
            ProjectileKind::Laser,
        );
        assert!(!p.out_of_bounds(800.0, 600.0));
        p.pos.y = -10.5;
        assert!(p.out_of_bounds(800.0, 600.0));
        p.pos = Vec2::new(811.0, 300.0);
        assert!(p.out_of_bounds(800.0, 600.0));
    }
}
