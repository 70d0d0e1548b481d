//! Upgrade ledger, synergy unlocks and milestone upgrades
//!
//! The ledger only counts upgrades and reports which synergies a grant just
//! unlocked. Turning an unlock into stats or screen feedback is the caller's
//! job, so the ledger never needs a handle on the player or the simulation.

use serde::{Deserialize, Serialize};

/// Upgrade categories tracked by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    Damage,
    FireRate,
    Spread,
    Pierce,
    Crit,
    Status,
}

impl UpgradeCategory {
    pub const ALL: [UpgradeCategory; 6] = [
        UpgradeCategory::Damage,
        UpgradeCategory::FireRate,
        UpgradeCategory::Spread,
        UpgradeCategory::Pierce,
        UpgradeCategory::Crit,
        UpgradeCategory::Status,
    ];

    /// Categories an elite kill can roll (uniformly)
    pub const ELITE_REWARDS: [UpgradeCategory; 5] = [
        UpgradeCategory::Damage,
        UpgradeCategory::FireRate,
        UpgradeCategory::Spread,
        UpgradeCategory::Pierce,
        UpgradeCategory::Crit,
    ];

    fn index(self) -> usize {
        match self {
            UpgradeCategory::Damage => 0,
            UpgradeCategory::FireRate => 1,
            UpgradeCategory::Spread => 2,
            UpgradeCategory::Pierce => 3,
            UpgradeCategory::Crit => 4,
            UpgradeCategory::Status => 5,
        }
    }
}

/// Permanent behavioral unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Synergy {
    /// Every 8th shot adds a plasma fan
    Overheat,
    /// Kills burst into fragments
    Shatter,
    /// Low-health targets die in one hit
    Execute,
}

impl Synergy {
    pub fn name(self) -> &'static str {
        match self {
            Synergy::Overheat => "OVERHEAT",
            Synergy::Shatter => "SHATTER",
            Synergy::Execute => "EXECUTE",
        }
    }
}

/// Monotonic synergy flags (never reset once set)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyFlags {
    overheat: bool,
    shatter: bool,
    execute: bool,
}

impl SynergyFlags {
    pub fn has(&self, synergy: Synergy) -> bool {
        match synergy {
            Synergy::Overheat => self.overheat,
            Synergy::Shatter => self.shatter,
            Synergy::Execute => self.execute,
        }
    }

    pub fn any(&self) -> bool {
        self.overheat || self.shatter || self.execute
    }

    /// Returns true if this call flipped the flag
    fn unlock(&mut self, synergy: Synergy) -> bool {
        let flag = match synergy {
            Synergy::Overheat => &mut self.overheat,
            Synergy::Shatter => &mut self.shatter,
            Synergy::Execute => &mut self.execute,
        };
        let newly = !*flag;
        *flag = true;
        newly
    }
}

/// Upgrade counts per category plus the synergies they have unlocked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    counts: [u32; 6],
    synergies: SynergyFlags,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: UpgradeCategory) -> u32 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn synergies(&self) -> SynergyFlags {
        self.synergies
    }

    pub fn has(&self, synergy: Synergy) -> bool {
        self.synergies.has(synergy)
    }

    /// Count one upgrade, then evaluate unlocks in fixed order
    /// (overheat, shatter, execute). Returns the synergies this call unlocked.
    pub fn add(&mut self, category: UpgradeCategory) -> Vec<Synergy> {
        self.counts[category.index()] += 1;

        use UpgradeCategory::*;
        let rules = [
            (Synergy::Overheat, self.count(Damage) >= 3 && self.count(FireRate) >= 2),
            (Synergy::Shatter, self.count(Spread) >= 2 && self.count(Pierce) >= 1),
            (Synergy::Execute, self.count(Crit) >= 2 && self.count(Damage) >= 2),
        ];

        rules
            .into_iter()
            .filter(|&(synergy, met)| met && self.synergies.unlock(synergy))
            .map(|(synergy, _)| synergy)
            .collect()
    }
}

/// Upgrades granted on wave milestones (bypass the ledger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneKind {
    /// Extra shots per volley
    SpreadShot,
    /// Extra shots per second
    FireRate,
}

/// Catalogue entry for a milestone upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneUpgrade {
    pub id: u32,
    pub name: &'static str,
    pub kind: MilestoneKind,
    pub value: i32,
    /// First wave this upgrade may be granted on
    pub unlocked_wave: u32,
}

/// Default milestone catalogue; a milestone wave grants the first entry
/// already unlocked by that wave
pub const MILESTONE_UPGRADES: [MilestoneUpgrade; 2] = [
    MilestoneUpgrade {
        id: 1,
        name: "Spread Shot",
        kind: MilestoneKind::SpreadShot,
        value: 2,
        unlocked_wave: 1,
    },
    MilestoneUpgrade {
        id: 2,
        name: "Fire Rate",
        kind: MilestoneKind::FireRate,
        value: 1,
        unlocked_wave: 1,
    },
];

/// Record of a milestone upgrade the player received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedUpgrade {
    pub kind: MilestoneKind,
    pub value: i32,
    pub wave: u32,
}
