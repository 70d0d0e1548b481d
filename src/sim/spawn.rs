//! Timed spawn queue for a wave

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::antagonist::AntagonistKind;
use crate::consts::*;

/// One queued antagonist
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSpawn {
    /// Seconds after wave start
    pub delay: f32,
    pub kind: AntagonistKind,
    /// Offset from the center lane
    pub x_offset: f32,
}

/// Number of queued antagonists for a wave
pub fn wave_size(wave: u32) -> u32 {
    WAVE_BASE_SPAWNS + wave * WAVE_SPAWNS_PER_WAVE
}

/// Front-to-back queue of spawns; entries are never reordered
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnQueue {
    entries: VecDeque<ScheduledSpawn>,
    /// Seconds since the wave started
    elapsed: f32,
    /// Antagonists admitted so far this wave (drives the off-screen stagger)
    admitted: u32,
}

impl SpawnQueue {
    /// Build the schedule for `wave`: one entry every half second with a
    /// random kind and a small horizontal offset
    pub fn for_wave(wave: u32, rng: &mut impl Rng) -> Self {
        let entries = (0..wave_size(wave))
            .map(|i| ScheduledSpawn {
                delay: i as f32 * WAVE_SPAWN_INTERVAL,
                kind: AntagonistKind::ALL[rng.random_range(0..AntagonistKind::ALL.len())],
                x_offset: rng.random_range(-SPAWN_OFFSET_RANGE..SPAWN_OFFSET_RANGE),
            })
            .collect();
        Self {
            entries,
            elapsed: 0.0,
            admitted: 0,
        }
    }

    /// Queue from explicit entries (arrival order is kept as given)
    pub fn from_entries(entries: impl IntoIterator<Item = ScheduledSpawn>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            elapsed: 0.0,
            admitted: 0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Pop the front entry if its delay has elapsed.
    ///
    /// Only the front is inspected, so a later entry with a shorter delay
    /// waits behind it.
    pub fn pop_due(&mut self) -> Option<ScheduledSpawn> {
        if self.entries.front()?.delay <= self.elapsed {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Vertical start position for the next admitted antagonist, then count it
    pub fn next_stagger(&mut self) -> f32 {
        let y = -(self.admitted as f32) * SPAWN_STAGGER;
        self.admitted += 1;
        y
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn admitted(&self) -> u32 {
        self.admitted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledSpawn> {
        self.entries.iter()
    }

    /// Sum of all queued delays
    pub fn total_delay(&self) -> f32 {
        self.entries.iter().map(|e| e.delay).sum()
    }
}
