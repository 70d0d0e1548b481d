//! Simulation state and the operations the frame update is built from
//!
//! Everything a run needs lives on one [`Simulation`]: both pools, the player
//! and its ledger, the spawn queue, feedback signals and the RNG. Separate
//! instances share nothing, so tests can run any number side by side.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::antagonist::{Antagonist, AntagonistKind, MotionPattern};
use super::feedback::{Feedback, Pulse};
use super::player::Player;
use super::pool::EntityPool;
use super::progression::{MILESTONE_UPGRADES, Synergy, UpgradeCategory};
use super::projectile::Projectile;
use super::spawn::{ScheduledSpawn, SpawnQueue};
use crate::consts::*;
use crate::tuning::Tuning;

/// Notable things that happened during the last update (for text cues/audio)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    WaveStarted { wave: u32 },
    EliteSpawned,
    EliteKilled { reward: UpgradeCategory },
    SynergyUnlocked(Synergy),
    MilestoneGranted { wave: u32 },
    GameOver { score: u64, wave: u32 },
}

/// The simulation core
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) player: Player,
    pub(crate) projectiles: EntityPool<Projectile>,
    pub(crate) antagonists: EntityPool<Antagonist>,
    pub(crate) spawns: SpawnQueue,
    pub(crate) feedback: Feedback,
    pub(crate) events: Vec<SimEvent>,
    /// Current wave (1-based once the first wave starts)
    pub(crate) wave: u32,
    pub(crate) score: u64,
    pub(crate) kills: u32,
    /// Kill count that triggers the next elite
    pub(crate) next_elite_at: u32,
    /// Fire intent for the next update
    pub(crate) fire_held: bool,
    /// Non-frozen frames simulated
    pub(crate) frames: u64,
    pub(crate) game_over: bool,
}

impl Simulation {
    /// Build a simulation and start wave 1 immediately
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut sim = Self {
            rng: Pcg32::seed_from_u64(tuning.seed),
            player: Player::new(&tuning),
            projectiles: EntityPool::new(tuning.projectile_capacity),
            antagonists: EntityPool::new(tuning.antagonist_capacity),
            spawns: SpawnQueue::default(),
            feedback: Feedback::default(),
            events: Vec::new(),
            wave: 0,
            score: 0,
            kills: 0,
            next_elite_at: FIRST_ELITE_AT,
            fire_held: false,
            frames: 0,
            game_over: false,
            tuning,
        };
        sim.advance_wave();
        sim
    }

    /// Default tuning on the given playfield
    pub fn with_playfield(width: f32, height: f32) -> Self {
        Self::new(Tuning::with_playfield(width, height))
    }

    // === Input intents ===

    /// Held horizontal movement, -1 (left) to 1 (right)
    pub fn set_move_intent(&mut self, direction: f32) {
        self.player.move_intent(direction);
    }

    /// Whether fire is held; consumed once per update, gated by cooldown
    pub fn set_fire_held(&mut self, held: bool) {
        self.fire_held = held;
    }

    // === Queries ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn width(&self) -> f32 {
        self.tuning.width
    }

    pub fn height(&self) -> f32 {
        self.tuning.height
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn antagonists(&self) -> impl Iterator<Item = &Antagonist> {
        self.antagonists.iter()
    }

    pub fn antagonist_count(&self) -> usize {
        self.antagonists.active_len()
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.active_len()
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn spawn_queue(&self) -> &SpawnQueue {
        &self.spawns
    }

    /// Events raised by the most recent update
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn current_wave(&self) -> u32 {
        self.wave
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn next_elite_at(&self) -> u32 {
        self.next_elite_at
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Wave is done: nothing queued and nothing alive
    pub fn wave_complete(&self) -> bool {
        self.spawns.is_empty() && self.antagonists.is_empty()
    }

    // === Spawning ===

    /// Admit a projectile into the pool.
    ///
    /// Degenerate (near-zero speed) projectiles and a full pool both yield
    /// `None`; the shot is simply dropped.
    pub fn spawn_projectile(&mut self, projectile: Projectile) -> Option<&mut Projectile> {
        if !projectile.is_launchable() {
            log::trace!("Rejected degenerate projectile at {:?}", projectile.pos);
            return None;
        }
        let Some(slot) = self.projectiles.acquire() else {
            log::debug!("Projectile pool exhausted");
            return None;
        };
        *slot = projectile;
        Some(slot)
    }

    /// Place a regular antagonist directly (bypasses the queue)
    pub fn spawn_antagonist(
        &mut self,
        pos: Vec2,
        health: i32,
        speed: f32,
        kind: AntagonistKind,
    ) -> Option<&mut Antagonist> {
        let Some(slot) = self.antagonists.acquire() else {
            log::debug!("Antagonist pool exhausted");
            return None;
        };
        slot.reset(pos, health, speed, kind);
        Some(slot)
    }

    /// Turn a due queue entry into a live antagonist, staggered off-screen
    pub(crate) fn admit(&mut self, entry: ScheduledSpawn) {
        if self.antagonists.available() == 0 {
            log::debug!("Skipped queued spawn: antagonist pool exhausted");
            return;
        }
        let wave = self.wave as i32;
        let y = self.spawns.next_stagger();
        let x = self.tuning.width * 0.5 + entry.x_offset;
        let health = ANTAGONIST_BASE_HEALTH + wave * ANTAGONIST_HEALTH_PER_WAVE;
        let speed = ANTAGONIST_BASE_SPEED + wave as f32 * ANTAGONIST_SPEED_PER_WAVE;
        self.spawn_antagonist(Vec2::new(x, y), health, speed, entry.kind);
    }

    /// Force an elite into play, scaled by wave and total upgrades
    pub fn spawn_elite(&mut self) -> bool {
        let health = ELITE_BASE_HEALTH
            + self.wave as i32 * ELITE_HEALTH_PER_WAVE
            + self.player.total_upgrades() as i32 * ELITE_HEALTH_PER_UPGRADE;
        let pos = Vec2::new(self.tuning.width * 0.5, ELITE_SPAWN_Y);
        let fire_interval = self.tuning.elite_fire_interval;

        let Some(elite) = self.spawn_antagonist(pos, health, ELITE_SPEED, AntagonistKind::Brute)
        else {
            return false;
        };
        elite.elite = true;
        elite.pattern = MotionPattern::Straight;
        elite.radius = ANTAGONIST_RADIUS;
        elite.fire_timer = fire_interval;

        log::info!("Elite spawned (hp {}) on wave {}", health, self.wave);
        self.feedback.pulse(Pulse::ELITE_SPAWN);
        self.events.push(SimEvent::EliteSpawned);
        true
    }

    // === Progression ===

    /// Start the next wave: new schedule, reset timers, maybe a milestone
    pub fn advance_wave(&mut self) {
        self.wave += 1;
        self.spawns = SpawnQueue::for_wave(self.wave, &mut self.rng);
        log::info!("Wave {}: {} queued", self.wave, self.spawns.len());
        self.events.push(SimEvent::WaveStarted { wave: self.wave });

        if self.wave % MILESTONE_WAVE_INTERVAL == 0 {
            let wave = self.wave;
            let available = MILESTONE_UPGRADES
                .iter()
                .copied()
                .find(|u| u.unlocked_wave <= wave);
            if let Some(upgrade) = available {
                self.player.apply_milestone(&upgrade, wave);
                log::info!("Milestone upgrade: {}", upgrade.name);
                self.events.push(SimEvent::MilestoneGranted { wave: self.wave });
            }
        }
    }

    /// Grant a ledger upgrade and turn any synergy unlocks into feedback
    pub fn grant_upgrade(&mut self, category: UpgradeCategory) {
        let grant = self.player.grant(category);
        for synergy in grant.unlocked {
            log::info!("Synergy unlocked: {}", synergy.name());
            self.feedback.pulse(Pulse::SYNERGY);
            self.events.push(SimEvent::SynergyUnlocked(synergy));
        }
    }

    /// Book a kill. Returns true when the kill count reached the elite threshold
    /// (the threshold has already been pushed forward).
    pub(crate) fn credit_kill(&mut self, kind: AntagonistKind, elite: bool) -> bool {
        self.kills += 1;
        self.score += kind.score();
        self.feedback.raise_ambient(KILL_SHAKE_FLOOR);
        log::debug!("Kill #{} ({:?}{})", self.kills, kind, if elite { ", elite" } else { "" });

        if elite {
            self.reward_elite_kill();
        }

        if self.kills >= self.next_elite_at {
            let jitter = self.rng.random_range(0..=ELITE_INTERVAL_JITTER);
            self.next_elite_at += ELITE_BASE_INTERVAL + jitter;
            return true;
        }
        false
    }

    fn reward_elite_kill(&mut self) {
        let rewards = UpgradeCategory::ELITE_REWARDS;
        let reward = rewards[self.rng.random_range(0..rewards.len())];
        log::debug!("Elite reward: {:?}", reward);
        self.grant_upgrade(reward);
        self.feedback.pulse(Pulse::ELITE_REWARD);
        self.events.push(SimEvent::EliteKilled { reward });
    }

    /// Release the antagonist at `index` if it is dead or has left the
    /// playfield. Returns true if released (do not advance the cursor), plus
    /// whether an elite is now due.
    pub(crate) fn retire_antagonist_at(&mut self, index: usize) -> (bool, bool) {
        let height = self.tuning.height;
        let Some(a) = self.antagonists.get(index) else {
            return (false, false);
        };
        if a.is_dead() {
            let (kind, elite) = (a.kind, a.elite);
            self.antagonists.release_at(index);
            let elite_due = self.credit_kill(kind, elite);
            (true, elite_due)
        } else if a.escaped(height) {
            self.antagonists.release_at(index);
            (true, false)
        } else {
            (false, false)
        }
    }

    /// Release every dead/escaped antagonist and every consumed projectile
    pub(crate) fn reap(&mut self) {
        let mut elites_due = 0;
        let mut i = 0;
        while i < self.antagonists.active_len() {
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

        let mut i = 0;
        while i < self.projectiles.active_len() {
            if self.projectiles.get(i).is_some_and(|p| p.to_destroy) {
                self.projectiles.release_at(i);
            } else {
                i += 1;
            }
        }
    }
}
