//! Read-only snapshot for renderers
//!
//! A renderer (or the headless driver) captures one of these after `update`
//! returns. Nothing in here can reach back into the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{AntagonistKind, Owner, ProjectileKind, SimEvent, Simulation, Synergy};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntagonistView {
    pub pos: Vec2,
    pub radius: f32,
    pub health_ratio: f32,
    pub flash_ratio: f32,
    pub kind: AntagonistKind,
    pub pulse_phase: f32,
    pub elite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorView {
    pub pos: Vec2,
    pub value: i32,
    pub critical: bool,
    pub life_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub health: i32,
    pub health_ratio: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimView {
    pub antagonists: Vec<AntagonistView>,
    pub projectiles: Vec<ProjectileView>,
    pub player: PlayerView,
    /// Ambient + impact magnitude for the camera offset
    pub shake: f32,
    pub indicators: Vec<IndicatorView>,
    pub synergies: Vec<Synergy>,
    pub events: Vec<SimEvent>,
    pub score: u64,
    pub wave: u32,
    pub game_over: bool,
}

impl SimView {
    pub fn capture(sim: &Simulation) -> Self {
        let antagonists = sim
            .antagonists()
            .map(|a| AntagonistView {
                pos: a.pos,
                radius: a.radius,
                health_ratio: a.health_ratio(),
                flash_ratio: a.flash_ratio(),
                kind: a.kind,
                pulse_phase: a.pulse_phase,
                elite: a.elite,
            })
            .collect();

        let projectiles = sim
            .projectiles()
            .filter(|p| p.is_live())
            .map(|p| ProjectileView {
                pos: p.pos,
                vel: p.vel,
                kind: p.kind,
                owner: p.owner,
            })
            .collect();

        let indicators = sim
            .feedback()
            .indicators
            .iter()
            .map(|ind| IndicatorView {
                pos: ind.pos,
                value: ind.value,
                critical: ind.critical,
                life_ratio: ind.life_ratio(),
            })
            .collect();

        let player = sim.player();
        let flags = player.ledger.synergies();
        let synergies = [Synergy::Overheat, Synergy::Shatter, Synergy::Execute]
            .into_iter()
            .filter(|&s| flags.has(s))
            .collect();

        Self {
            antagonists,
            projectiles,
            player: PlayerView {
                pos: player.pos,
                health: player.health,
                health_ratio: player.health_ratio(),
            },
            shake: sim.feedback().total_shake(),
            indicators,
            synergies,
            events: sim.events().to_vec(),
            score: sim.score(),
            wave: sim.current_wave(),
            game_over: sim.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AntagonistKind, UpgradeCategory};
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_fresh_simulation() {
        let sim = Simulation::new(Tuning::default());
        let view = SimView::capture(&sim);
        assert!(view.antagonists.is_empty());
        assert!(view.projectiles.is_empty());
        assert_eq!(view.player.pos, Vec2::new(400.0, 550.0));
        assert_eq!(view.player.health_ratio, 1.0);
        assert_eq!(view.wave, 1);
        assert_eq!(view.score, 0);
        assert!(!view.game_over);
        assert_eq!(view.events, vec![SimEvent::WaveStarted { wave: 1 }]);
    }

    #[test]
    fn test_capture_reports_ratios_and_synergies() {
        let mut sim = Simulation::new(Tuning::default());
        sim.spawn_antagonist(Vec2::new(100.0, 100.0), 40, 0.0, AntagonistKind::Brute)
            .unwrap()
            .health = 10;
        sim.grant_upgrade(UpgradeCategory::Spread);
        sim.grant_upgrade(UpgradeCategory::Spread);
        sim.grant_upgrade(UpgradeCategory::Pierce);

        let view = SimView::capture(&sim);
        assert_eq!(view.antagonists.len(), 1);
        assert!((view.antagonists[0].health_ratio - 0.25).abs() < 0.001);
        assert_eq!(view.antagonists[0].kind, AntagonistKind::Brute);
        assert_eq!(view.synergies, vec![Synergy::Shatter]);
        assert_eq!(view.shake, 12.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::new(Tuning::default());
        let json = serde_json::to_string(&SimView::capture(&sim)).unwrap();
        assert!(json.contains("\"wave\":1"));
        assert!(json.contains("\"game_over\":false"));
    }
}
