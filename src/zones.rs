// Procedural fallback planning: when the collaborator sends no ground-truth
// mask, we synthesize damage zones sized/placed at random and let draw.rs
// paint them as radial gradients.
//
// Placement is random per render (statistically similar, visually
// different each time). Hosts needing reproducible output inject a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::scale::DisplaySize;

/// One tier of synthesized zones. Order here is draw order: severe is
/// painted first so the lighter tiers stay legible on top at overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTier {
    Severe,
    Moderate,
    Minor,
}

impl ZoneTier {
    pub const DRAW_ORDER: [ZoneTier; 3] = [ZoneTier::Severe, ZoneTier::Moderate, ZoneTier::Minor];

    pub fn color(self) -> (u8, u8, u8) {
        match self {
            ZoneTier::Severe => (220, 38, 38),    // red
            ZoneTier::Moderate => (249, 115, 22), // orange
            ZoneTier::Minor => (234, 179, 8),     // yellow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoneTier::Severe => "Severe",
            ZoneTier::Moderate => "Moderate",
            ZoneTier::Minor => "Minor",
        }
    }

    /// Zone extent range in display units before the display scale is applied.
    fn size_range(self) -> (f32, f32) {
        match self {
            ZoneTier::Severe => (100.0, 250.0),
            ZoneTier::Moderate => (80.0, 200.0),
            ZoneTier::Minor => (60.0, 160.0),
        }
    }
}

/// Total zone count for a clamped damage percentage: at least 4 zones even
/// at 0% damage, up to 12 at 100%.
pub fn zone_budget(damage_percentage: u8) -> usize {
    let intensity = damage_percentage.min(100) as f32 / 100.0;
    (intensity * 8.0).floor() as usize + 4
}

/// Per-tier split of the zone budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub severe: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl TierCounts {
    /// Fixed 30/40/30 proportions; the rounding remainder is dropped, not
    /// redistributed.
    pub fn split(num_zones: usize) -> TierCounts {
        TierCounts {
            severe: (num_zones as f32 * 0.3).floor() as usize,
            moderate: (num_zones as f32 * 0.4).floor() as usize,
            minor: (num_zones as f32 * 0.3).floor() as usize,
        }
    }

    pub fn for_tier(&self, tier: ZoneTier) -> usize {
        match tier {
            ZoneTier::Severe => self.severe,
            ZoneTier::Moderate => self.moderate,
            ZoneTier::Minor => self.minor,
        }
    }

    pub fn total(&self) -> usize {
        self.severe + self.moderate + self.minor
    }
}

/// One planned damage zone, in display coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub tier: ZoneTier,
    pub cx: f32,
    pub cy: f32,
    /// Half of max(sampled width, sampled height).
    pub radius: f32,
    /// Gradient opacity at the center stop, sampled in [0.55, 0.65].
    pub center_alpha: f32,
}

/// Seedable source of zone plans.
///
/// Wraps `ChaCha8Rng` so identical seeds produce identical plans on every
/// platform. Default construction seeds from OS entropy, which keeps
/// production renders intentionally non-deterministic.
pub struct ZoneSampler {
    rng: ChaCha8Rng,
    zones_sampled: u64,
}

impl ZoneSampler {
    pub fn new() -> ZoneSampler {
        ZoneSampler {
            rng: ChaCha8Rng::from_entropy(),
            zones_sampled: 0,
        }
    }

    pub fn with_seed(seed: u64) -> ZoneSampler {
        ZoneSampler {
            rng: ChaCha8Rng::seed_from_u64(seed),
            zones_sampled: 0,
        }
    }

    /// Running count of zones sampled so far; lets callers verify the
    /// fallback path was (or wasn't) exercised.
    pub fn zones_sampled(&self) -> u64 {
        self.zones_sampled
    }

    /// Plan a full set of zones for one render, in draw order
    /// (severe, then moderate, then minor).
    pub fn sample_plan(&mut self, counts: TierCounts, display: &DisplaySize) -> Vec<Zone> {
        let mut plan = Vec::with_capacity(counts.total());
        for tier in ZoneTier::DRAW_ORDER {
            for _ in 0..counts.for_tier(tier) {
                plan.push(self.sample_zone(tier, display));
            }
        }
        plan
    }

    fn sample_zone(&mut self, tier: ZoneTier, display: &DisplaySize) -> Zone {
        let (lo, hi) = tier.size_range();
        let width = self.rng.gen_range(lo..hi) * display.scale;
        let height = self.rng.gen_range(lo..hi) * display.scale;
        let zone = Zone {
            tier,
            cx: self.rng.gen_range(0.0..display.width as f32),
            cy: self.rng.gen_range(0.0..display.height as f32),
            radius: (width.max(height) / 2.0).max(1.0),
            center_alpha: self.rng.gen_range(0.55..0.65),
        };
        self.zones_sampled += 1;
        zone
    }
}

impl Default for ZoneSampler {
    fn default() -> Self {
        Self::new()
    }
}
