//! Per-frame simulation update
//!
//! One `update(dt)` call runs the whole frame to completion, in order:
//! hit-stop, player, spawn admission, antagonists, projectiles, collisions,
//! shake decay, damage indicators, wave transition, game over.

use glam::Vec2;

use super::collision::{WindowSweep, projectile_hits};
use super::progression::Synergy;
use super::projectile::{Owner, Projectile, ProjectileKind};
use super::state::{SimEvent, Simulation};
use crate::consts::*;
use crate::aabb_overlap;

/// Input intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Horizontal movement, -1 (left) to 1 (right)
    pub move_dir: f32,
    /// Fire held (subject to the player's cooldown)
    pub fire: bool,
}

/// Apply the frame's intents and advance the simulation by `dt` seconds
pub fn tick(sim: &mut Simulation, input: &FrameInput, dt: f32) {
    sim.set_move_intent(input.move_dir);
    sim.set_fire_held(input.fire);
    sim.update(dt);
}

impl Simulation {
    /// Advance one frame. A no-op once the game is over.
    pub fn update(&mut self, dt: f32) {
        if self.game_over {
            return;
        }
        self.events.clear();

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        // Hit-stop: feedback keeps moving, gameplay does not
        if self.feedback.is_frozen() {
            self.feedback.tick_frozen();
            return;
        }
        self.frames += 1;

        self.update_player(dt);
        self.admit_due_spawns(dt);
        self.update_antagonists(dt);
        self.update_projectiles(dt);

        self.resolve_player_shots();
        self.resolve_hostile_shots();
        self.resolve_contact();
        self.reap();

        self.feedback.decay();
        self.feedback.advance_indicators(dt);

        if self.wave_complete() {
            self.advance_wave();
        }

        if self.player.is_dead() {
            self.game_over = true;
            log::info!("Game over: score {} on wave {}", self.score, self.wave);
            self.events.push(SimEvent::GameOver {
                score: self.score,
                wave: self.wave,
            });
        }
    }

    fn update_player(&mut self, dt: f32) {
        self.player.update(dt, self.tuning.width);
        if self.fire_held {
            for shot in self.player.try_fire() {
                self.spawn_projectile(shot);
            }
        }
    }

    fn admit_due_spawns(&mut self, dt: f32) {
        self.spawns.advance(dt);
        while let Some(entry) = self.spawns.pop_due() {
            self.admit(entry);
        }
    }

    /// Move antagonists, let elites shoot, and release the dead or escaped
    fn update_antagonists(&mut self, dt: f32) {
        let fire_interval = self.tuning.elite_fire_interval;
        let mut hostile_shots = Vec::new();
        let mut elites_due = 0;

        let mut i = 0;
        while i < self.antagonists.active_len() {
            if let Some(a) = self.antagonists.get_mut(i) {
                a.update(dt);
                if a.elite && a.pos.y >= 0.0 {
                    a.fire_timer -= dt;
                    if a.fire_timer <= 0.0 {
                        a.fire_timer = fire_interval;
                        hostile_shots.push(a.pos + Vec2::new(0.0, a.radius));
                    }
                }
            }

            let (released, elite_due) = self.retire_antagonist_at(i);
            if elite_due {
                elites_due += 1;
            }
            if !released {
                i += 1;
            }
        }

        for _ in 0..elites_due {
            self.spawn_elite();
        }
        for pos in hostile_shots {
            let shot = Projectile::toward(
                pos,
                std::f32::consts::FRAC_PI_2,
                self.tuning.hostile_shot_speed,
                self.tuning.hostile_shot_damage,
                Owner::Hostile,
                ProjectileKind::Laser,
            );
            self.spawn_projectile(shot);
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        let (width, height) = (self.tuning.width, self.tuning.height);
        let mut i = 0;
        while i < self.projectiles.active_len() {
            let expired = match self.projectiles.get_mut(i) {
                Some(p) => {
                    p.update(dt);
                    p.to_destroy || p.out_of_bounds(width, height)
                }
                None => false,
            };
            if expired {
                self.projectiles.release_at(i);
            } else {
                i += 1;
            }
        }
    }

    /// Player shots vs. antagonists: y-sorted window sweep, then box overlap
    fn resolve_player_shots(&mut self) {
        self.antagonists
            .sort_active_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        let ys: Vec<f32> = self.antagonists.iter().map(|a| a.pos.y).collect();

        let execute = self.player.ledger.has(Synergy::Execute);
        let shatter = self.player.ledger.has(Synergy::Shatter);
        let mut shatter_sites = Vec::new();

        for pi in 0..self.projectiles.active_len() {
            let Some(shot) = self.projectiles.get(pi) else {
                continue;
            };
            if !shot.is_live() || shot.owner != Owner::Player {
                continue;
            }
            let (point, damage) = (shot.pos, shot.damage);

            for ai in WindowSweep::new(&ys, point.y, SWEEP_WINDOW) {
                let Some(target) = self.antagonists.get_mut(ai) else {
                    continue;
                };
                if target.is_dead() || !projectile_hits(point, target) {
                    continue;
                }

                let killed = if execute && target.executable() {
                    target.health = 0;
                    self.feedback.add_impact(EXECUTE_IMPACT_STEP, IMPACT_SHAKE_CAP);
                    true
                } else {
                    let hit = target.take_damage(damage, &mut self.rng);
                    let label = target.pos - Vec2::new(0.0, target.radius);
                    self.feedback.push_indicator(label, hit.amount, hit.critical);
                    if hit.critical {
                        self.feedback.add_impact(CRIT_IMPACT_STEP, IMPACT_SHAKE_CAP);
                    }
                    target.is_dead()
                };
                if killed && shatter {
                    shatter_sites.push(target.pos);
                }

                self.feedback.raise_ambient(HIT_SHAKE_FLOOR);
                self.feedback.hit_stop(HIT_STOP_FRAMES);

                let Some(shot) = self.projectiles.get_mut(pi) else {
                    break;
                };
                if shot.pierce == 0 {
                    shot.to_destroy = true;
                    break;
                }
                shot.pierce -= 1;
            }
        }

        for site in shatter_sites {
            self.spawn_shatter_fragments(site);
        }
    }

    /// Four diagonal fragments at half damage
    fn spawn_shatter_fragments(&mut self, site: Vec2) {
        let damage = (self.player.base_damage / 2).max(1);
        for k in 0..SHATTER_FRAGMENTS {
            let angle = std::f32::consts::FRAC_PI_4 + k as f32 * std::f32::consts::FRAC_PI_2;
            let fragment = Projectile::toward(
                site,
                angle,
                SHATTER_FRAGMENT_SPEED,
                damage,
                Owner::Player,
                ProjectileKind::Spread,
            );
            self.spawn_projectile(fragment);
        }
    }

    fn resolve_hostile_shots(&mut self) {
        let player_pos = self.player.pos;
        for i in 0..self.projectiles.active_len() {
            let Some(shot) = self.projectiles.get_mut(i) else {
                continue;
            };
            if !shot.is_live() || shot.owner != Owner::Hostile {
                continue;
            }
            if aabb_overlap(shot.pos, player_pos, PLAYER_HALF_EXTENT) {
                shot.to_destroy = true;
                self.player.take_damage(shot.damage);
                self.feedback.add_impact(PLAYER_HIT_IMPACT, IMPACT_SHAKE_CAP);
            }
        }
    }

    /// Antagonists that reach the player hurt it and are removed without credit
    fn resolve_contact(&mut self) {
        let player_pos = self.player.pos;
        let mut i = 0;
        while i < self.antagonists.active_len() {
            let rammed = self.antagonists.get(i).is_some_and(|a| {
                !a.is_dead() && aabb_overlap(player_pos, a.pos, a.radius + PLAYER_HALF_EXTENT)
            });
            if rammed {
                self.antagonists.release_at(i);
                self.player.take_damage(self.tuning.contact_damage);
                self.feedback.raise_ambient(KILL_SHAKE_FLOOR);
                self.feedback.add_impact(PLAYER_HIT_IMPACT, IMPACT_SHAKE_CAP);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::antagonist::AntagonistKind;
    use crate::sim::feedback::Feedback;
    use crate::sim::progression::UpgradeCategory;
    use crate::tuning::Tuning;

    fn quiet_sim() -> Simulation {
        let mut sim = Simulation::new(Tuning::default());
        sim.spawns.clear();
        sim
    }

    fn player_shot(pos: Vec2, damage: i32) -> Projectile {
        Projectile::new(
            pos,
            Vec2::new(0.0, -1.0),
            damage,
            Owner::Player,
            ProjectileKind::Laser,
        )
    }

    fn wave_starts(sim: &Simulation) -> usize {
        sim.events()
            .iter()
            .filter(|e| matches!(e, SimEvent::WaveStarted { .. }))
            .count()
    }

    #[test]
    fn test_first_wave_clears_into_second() {
        let mut sim = Simulation::new(Tuning::default());
        assert_eq!(sim.current_wave(), 1);
        assert_eq!(sim.spawn_queue().len(), 7);

        let mut frames = 0;
        while !sim.spawn_queue().is_empty() {
            sim.update(0.05);
            sim.antagonists.clear();
            frames += 1;
            assert!(frames < 200, "spawn queue never drained");
        }
        assert!(sim.spawn_queue().elapsed() >= 3.0);
        assert_eq!(sim.current_wave(), 1);

        sim.update(0.05);
        assert_eq!(sim.current_wave(), 2);
        assert_eq!(sim.spawn_queue().len(), 9);
        assert_eq!(wave_starts(&sim), 1);
    }

    #[test]
    fn test_one_health_kill_in_a_single_update() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(200.0, 300.0), 1, 0.0, AntagonistKind::Weaver);
        sim.spawn_projectile(player_shot(Vec2::new(200.0, 305.0), 10));

        sim.update(0.001);

        assert_eq!(sim.antagonist_count(), 0);
        assert_eq!(sim.score(), 20);
        assert_eq!(sim.kills(), 1);
        assert_eq!(sim.feedback().indicators.len(), 1);
        let indicator = sim.feedback().indicators[0];
        let expected = if indicator.critical { 18 } else { 10 };
        assert_eq!(indicator.value, expected);
        assert_eq!(sim.feedback().freeze_frames, 3);
        assert_eq!(sim.projectile_count(), 0);
    }

    #[test]
    fn test_freeze_pauses_gameplay() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(100.0, 100.0), 50, 100.0, AntagonistKind::Scout);
        sim.feedback.freeze_frames = 2;
        sim.feedback.ambient_shake = 10.0;
        sim.feedback.impact_shake = 4.0;

        sim.update(0.05);
        sim.update(0.05);
        let a = sim.antagonists().next().unwrap();
        assert_eq!(a.pos.y, 100.0);
        assert_eq!(sim.frames(), 0);
        assert_eq!(sim.feedback().impact_shake, 4.0);
        assert!(sim.feedback().ambient_shake < 10.0);

        sim.update(0.05);
        let a = sim.antagonists().next().unwrap();
        assert!((a.pos.y - 105.0).abs() < 0.001);
        assert_eq!(sim.frames(), 1);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(100.0, 0.0), 50, 100.0, AntagonistKind::Scout);
        sim.update(1.0);
        let a = sim.antagonists().next().unwrap();
        assert!((a.pos.y - 5.0).abs() < 0.001);

        sim.update(f32::NAN);
        sim.update(-1.0);
        let a = sim.antagonists().next().unwrap();
        assert!((a.pos.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_game_over_is_a_latch() {
        let mut sim = Simulation::new(Tuning::default());
        sim.player.take_damage(1000);
        sim.update(0.016);
        assert!(sim.is_game_over());
        assert!(matches!(sim.events().last(), Some(SimEvent::GameOver { .. })));

        let frames = sim.frames();
        let elapsed = sim.spawn_queue().elapsed();
        for _ in 0..10 {
            sim.update(0.016);
        }
        assert!(sim.is_game_over());
        assert_eq!(sim.frames(), frames);
        assert_eq!(sim.spawn_queue().elapsed(), elapsed);
    }

    #[test]
    fn test_wave_completion_advances_exactly_once() {
        let mut sim = quiet_sim();
        assert!(sim.wave_complete());
        sim.update(0.016);
        assert_eq!(sim.current_wave(), 2);
        assert_eq!(wave_starts(&sim), 1);

        sim.update(0.016);
        assert_eq!(sim.current_wave(), 2);
        assert_eq!(wave_starts(&sim), 0);
    }

    #[test]
    fn test_live_antagonist_blocks_wave_completion() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(100.0, 100.0), 50, 0.0, AntagonistKind::Scout);
        sim.update(0.016);
        assert_eq!(sim.current_wave(), 1);
    }

    #[test]
    fn test_sweep_ignores_antagonists_out_of_window() {
        let mut sim = quiet_sim();
        // The outer two are 40px away with a 50px box: they overlap the shot,
        // but sit outside the 30px window
        sim.spawn_antagonist(Vec2::new(300.0, 260.0), 100, 0.0, AntagonistKind::Scout)
            .unwrap()
            .radius = 50.0;
        sim.spawn_antagonist(Vec2::new(300.0, 300.0), 100, 0.0, AntagonistKind::Scout);
        sim.spawn_antagonist(Vec2::new(300.0, 340.0), 100, 0.0, AntagonistKind::Scout)
            .unwrap()
            .radius = 50.0;
        assert!(sim.antagonists().all(|a| projectile_hits(Vec2::new(300.0, 300.0), a)));
        sim.spawn_projectile(player_shot(Vec2::new(300.0, 300.0), 10).with_pierce(5));

        sim.update(0.001);

        let damaged: Vec<f32> = sim
            .antagonists()
            .filter(|a| a.health < 100)
            .map(|a| a.pos.y)
            .collect();
        assert_eq!(damaged.len(), 1);
        assert!((damaged[0] - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_custom_playfield_drives_placement_clamp_and_culling() {
        let mut sim = Simulation::with_playfield(400.0, 300.0);
        assert_eq!(sim.tuning().height, 300.0);
        assert_eq!(sim.player().pos, Vec2::new(200.0, 250.0));

        let first = *sim.spawn_queue().iter().next().unwrap();
        sim.update(0.016);
        let spawned = sim.antagonists().next().unwrap();
        assert!((spawned.pos.x - (200.0 + first.x_offset)).abs() < 0.1);

        // Shot heading down past the bottom edge (300 + 10 margin)
        sim.spawn_projectile(player_shot(Vec2::new(50.0, 300.0), 10));
        sim.projectiles.get_mut(0).unwrap().vel = Vec2::new(0.0, 500.0);
        sim.update(0.01);
        assert_eq!(sim.projectile_count(), 1);
        sim.update(0.02);
        assert_eq!(sim.projectile_count(), 0);

        let right = FrameInput { move_dir: 1.0, fire: false };
        for _ in 0..100 {
            tick(&mut sim, &right, 0.05);
        }
        assert_eq!(sim.player().pos.x, 400.0);
    }

    #[test]
    fn test_pierce_passes_through() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(300.0, 300.0), 100, 0.0, AntagonistKind::Scout);
        sim.spawn_antagonist(Vec2::new(300.0, 320.0), 100, 0.0, AntagonistKind::Scout);
        sim.spawn_projectile(player_shot(Vec2::new(300.0, 310.0), 10).with_pierce(2));

        sim.update(0.001);

        assert!(sim.antagonists().all(|a| a.health < 100));
        assert_eq!(sim.feedback().indicators.len(), 2);
        let shot = sim.projectiles().next().unwrap();
        assert_eq!(shot.pierce, 0);
        assert!(!shot.to_destroy);
    }

    #[test]
    fn test_pierce_exhausted_on_last_hit() {
        let mut sim = quiet_sim();
        sim.spawn_antagonist(Vec2::new(300.0, 300.0), 100, 0.0, AntagonistKind::Scout);
        sim.spawn_antagonist(Vec2::new(300.0, 320.0), 100, 0.0, AntagonistKind::Scout);
        sim.spawn_projectile(player_shot(Vec2::new(300.0, 310.0), 10).with_pierce(1));

        sim.update(0.001);

        assert!(sim.antagonists().all(|a| a.health < 100));
        assert_eq!(sim.projectile_count(), 0);
    }

    #[test]
    fn test_execute_kills_low_health_targets() {
        let mut sim = quiet_sim();
        for c in [
            UpgradeCategory::Crit,
            UpgradeCategory::Crit,
            UpgradeCategory::Damage,
            UpgradeCategory::Damage,
        ] {
            sim.grant_upgrade(c);
        }
        assert!(sim.player().ledger.has(Synergy::Execute));
        sim.feedback = Feedback::default();

        sim.spawn_antagonist(Vec2::new(200.0, 200.0), 100, 0.0, AntagonistKind::Brute);
        sim.antagonists.get_mut(0).unwrap().health = 15;
        sim.spawn_projectile(player_shot(Vec2::new(200.0, 200.0), 1));

        sim.update(0.001);

        assert_eq!(sim.antagonist_count(), 0);
        assert_eq!(sim.score(), 50);
        assert!(sim.feedback().indicators.is_empty());
        assert!((sim.feedback().impact_shake - 3.0 * IMPACT_SHAKE_DECAY).abs() < 0.001);
        assert_eq!(sim.feedback().freeze_frames, 3);
    }

    #[test]
    fn test_shatter_spawns_fragments() {
        let mut sim = quiet_sim();
        sim.grant_upgrade(UpgradeCategory::Spread);
        sim.grant_upgrade(UpgradeCategory::Spread);
        sim.grant_upgrade(UpgradeCategory::Pierce);
        assert!(sim.player().ledger.has(Synergy::Shatter));
        sim.feedback = Feedback::default();

        sim.spawn_antagonist(Vec2::new(400.0, 300.0), 1, 0.0, AntagonistKind::Scout);
        sim.spawn_projectile(player_shot(Vec2::new(400.0, 300.0), 10));

        sim.update(0.001);

        assert_eq!(sim.antagonist_count(), 0);
        let fragments: Vec<&Projectile> = sim.projectiles().collect();
        assert_eq!(fragments.len(), 4);
        assert!(fragments.iter().all(|p| p.kind == ProjectileKind::Spread && p.damage == 5));
        assert!(fragments.iter().all(|p| p.vel.x.abs() > 1.0 && p.vel.y.abs() > 1.0));
    }

    #[test]
    fn test_kill_at_threshold_spawns_elite() {
        let mut sim = quiet_sim();
        sim.kills = FIRST_ELITE_AT - 1;
        sim.spawn_antagonist(Vec2::new(200.0, 300.0), 1, 0.0, AntagonistKind::Scout);
        sim.spawn_projectile(player_shot(Vec2::new(200.0, 300.0), 10));

        sim.update(0.001);

        assert_eq!(sim.kills(), FIRST_ELITE_AT);
        assert!(sim.events().contains(&SimEvent::EliteSpawned));
        let elite = sim.antagonists().next().unwrap();
        assert!(elite.elite);
        assert!(sim.next_elite_at() > FIRST_ELITE_AT);
    }

    #[test]
    fn test_elite_fires_hostile_shots() {
        let mut sim = quiet_sim();
        assert!(sim.spawn_elite());
        sim.feedback = Feedback::default();
        {
            let elite = sim.antagonists.get_mut(0).unwrap();
            elite.pos.y = 100.0;
            elite.fire_timer = 0.001;
        }

        sim.update(0.016);

        let shot = sim.projectiles().next().unwrap();
        assert_eq!(shot.owner, Owner::Hostile);
        assert!(shot.vel.y > 0.0);
        assert!((sim.antagonists().next().unwrap().fire_timer - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_hostile_shot_hurts_player() {
        let mut sim = quiet_sim();
        let at = sim.player().pos;
        let shot = Projectile::new(at, Vec2::new(0.0, 1.0), 5, Owner::Hostile, ProjectileKind::Laser);
        sim.spawn_projectile(shot);

        sim.update(0.001);

        assert_eq!(sim.player().health, 95);
        assert_eq!(sim.projectile_count(), 0);
    }

    #[test]
    fn test_contact_damages_player_without_credit() {
        let mut sim = quiet_sim();
        let at = sim.player().pos;
        sim.spawn_antagonist(at, 50, 0.0, AntagonistKind::Scout);

        sim.update(0.001);

        assert_eq!(sim.player().health, 90);
        assert_eq!(sim.antagonist_count(), 0);
        assert_eq!(sim.kills(), 0);
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_fire_intent_spawns_volley() {
        let mut sim = quiet_sim();
        tick(&mut sim, &FrameInput { move_dir: 0.0, fire: true }, 0.016);
        assert_eq!(sim.projectile_count(), 1);
        // Cooldown gates the next frame
        tick(&mut sim, &FrameInput { move_dir: 0.0, fire: true }, 0.016);
        assert_eq!(sim.projectile_count(), 1);
    }

    #[test]
    fn test_pool_exhaustion_is_soft() {
        let mut sim = Simulation::new(Tuning {
            antagonist_capacity: 2,
            projectile_capacity: 3,
            ..Tuning::default()
        });
        let input = FrameInput { move_dir: 0.0, fire: true };
        for _ in 0..200 {
            tick(&mut sim, &input, 0.05);
            assert!(sim.antagonist_count() <= 2);
            assert!(sim.projectile_count() <= 3);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = Simulation::new(Tuning::default());
        let mut b = Simulation::new(Tuning::default());
        for frame in 0..1200 {
            let input = FrameInput {
                move_dir: if (frame / 90) % 2 == 0 { 1.0 } else { -1.0 },
                fire: true,
            };
            tick(&mut a, &input, 1.0 / 60.0);
            tick(&mut b, &input, 1.0 / 60.0);
        }
        assert_eq!(a.score(), b.score());
        assert_eq!(a.kills(), b.kills());
        assert_eq!(a.current_wave(), b.current_wave());
        assert_eq!(a.player().pos, b.player().pos);
        assert_eq!(a.player().health, b.player().health);
        assert_eq!(a.projectile_count(), b.projectile_count());
        assert_eq!(a.antagonist_count(), b.antagonist_count());
    }
}
