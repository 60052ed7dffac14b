// The overlay renderer: consumes (photo, assessment) pairs and produces a
// composited RenderSurface, with a visibility toggle between the composite
// and the plain photo.
//
// Rendering runs to completion on the caller's thread. Staleness is
// handled with a generation token: `begin_render` invalidates any
// in-flight request, and `render` silently ignores tokens that no longer
// match (a superseded decode completion is not an error).

use log::{debug, info, warn};

use crate::decode;
use crate::draw;
use crate::error::OverlayError;
use crate::gamma::GammaLut;
use crate::scale::{self, DisplaySize, MAX_DISPLAY_WIDTH};
use crate::types::{AssessmentResult, RenderSurface, SourceImage};
use crate::zones::{TierCounts, ZoneSampler, ZoneTier, zone_budget};

/// Opaque request token tying a decode completion to the render request
/// that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderToken(u64);

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The surface was rebuilt. `used_mask` is true when the ground-truth
    /// mask drove the overlay, false when the procedural fallback did.
    Rendered { used_mask: bool },
    /// The request was superseded by a newer one; nothing changed.
    Stale,
}

/// Which layer the host should currently display.
pub enum DisplayLayer<'a> {
    /// The composited overlay surface.
    Overlay(&'a RenderSurface),
    /// The unmodified source photo preview.
    Original,
}

/// One row of the static tier legend.
pub struct LegendEntry {
    pub color: (u8, u8, u8),
    pub label: &'static str,
}

/// Fixed tier/color legend for the host to render statically.
pub fn legend() -> [LegendEntry; 3] {
    [
        LegendEntry { color: ZoneTier::Severe.color(), label: ZoneTier::Severe.label() },
        LegendEntry { color: ZoneTier::Moderate.color(), label: ZoneTier::Moderate.label() },
        LegendEntry { color: ZoneTier::Minor.color(), label: ZoneTier::Minor.label() },
    ]
}

pub struct OverlayRenderer {
    max_display_width: u32,
    lut: GammaLut,
    sampler: ZoneSampler,
    surface: Option<RenderSurface>,
    overlay_visible: bool,
    generation: u64,
}

impl OverlayRenderer {
    /// Renderer with the default display-width cap and entropy-seeded zone
    /// placement (each fallback render looks different — see crate docs).
    pub fn new() -> OverlayRenderer {
        Self::with_sampler(MAX_DISPLAY_WIDTH, ZoneSampler::new())
    }

    pub fn with_max_display_width(max_display_width: u32) -> OverlayRenderer {
        Self::with_sampler(max_display_width, ZoneSampler::new())
    }

    /// Deterministic zone placement for a given seed; intended for tests
    /// and hosts that need reproducible fallback output.
    pub fn with_seed(max_display_width: u32, seed: u64) -> OverlayRenderer {
        Self::with_sampler(max_display_width, ZoneSampler::with_seed(seed))
    }

    fn with_sampler(max_display_width: u32, sampler: ZoneSampler) -> OverlayRenderer {
        OverlayRenderer {
            max_display_width,
            lut: GammaLut::new(),
            sampler,
            surface: None,
            overlay_visible: true,
            generation: 0,
        }
    }

    /// Start a new render request, invalidating any in-flight one. Call
    /// this when the user selects a new image or a new assessment arrives;
    /// pass the token back to [`render`](Self::render) once decoding is done.
    pub fn begin_render(&mut self) -> RenderToken {
        self.generation += 1;
        RenderToken(self.generation)
    }

    /// Rebuild the surface for one (photo, assessment) pair.
    ///
    /// With a decodable segmentation mask the ground-truth path runs; a
    /// missing or undecodable mask takes the procedural fallback. A token
    /// from a superseded request returns [`RenderOutcome::Stale`] without
    /// touching the surface.
    pub fn render(
        &mut self,
        token: RenderToken,
        source: &SourceImage,
        assessment: &AssessmentResult,
    ) -> Result<RenderOutcome, OverlayError> {
        if token.0 != self.generation {
            debug!(
                "discarding stale render request (token {} vs generation {})",
                token.0, self.generation
            );
            return Ok(RenderOutcome::Stale);
        }

        let (sw, sh) = source.dimensions();
        let display = scale::resolve(sw, sh, self.max_display_width)?;

        let mut surface = RenderSurface::new(display.width, display.height);
        draw::draw_base_layer(&mut surface, source, &display)?;

        let used_mask = match assessment.segmentation_mask.as_deref() {
            Some(payload) => match decode::mask_from_payload(payload) {
                Ok(mask) => {
                    draw::blend_mask_layer(&mut surface, &mask, &display, &self.lut);
                    true
                }
                Err(err) => {
                    warn!("mask unusable, falling back to procedural zones: {err}");
                    self.draw_fallback(&mut surface, assessment.damage_percentage, &display);
                    false
                }
            },
            None => {
                self.draw_fallback(&mut surface, assessment.damage_percentage, &display);
                false
            }
        };

        draw::stroke_border(&mut surface, &self.lut);
        self.surface = Some(surface);

        info!(
            "rendered {}x{} overlay ({}, {}% damage, {})",
            display.width,
            display.height,
            assessment.severity.label(),
            assessment.damage_percentage,
            if used_mask { "ground-truth mask" } else { "procedural zones" },
        );
        Ok(RenderOutcome::Rendered { used_mask })
    }

    fn draw_fallback(&mut self, surface: &mut RenderSurface, damage: u8, display: &DisplaySize) {
        let counts = TierCounts::split(zone_budget(damage));
        for zone in self.sampler.sample_plan(counts, display) {
            draw::draw_zone(surface, &zone, &self.lut);
        }
    }

    /// Flip overlay visibility and return the new state. Never re-renders;
    /// it only changes which pre-rendered layer [`displayed`](Self::displayed)
    /// reports.
    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay_visible = !self.overlay_visible;
        self.overlay_visible
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Last-rendered composite, if any.
    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    /// Which layer the host should show right now.
    pub fn displayed(&self) -> DisplayLayer<'_> {
        match (&self.surface, self.overlay_visible) {
            (Some(surface), true) => DisplayLayer::Overlay(surface),
            _ => DisplayLayer::Original,
        }
    }

    #[cfg(test)]
    pub(crate) fn zones_sampled(&self) -> u64 {
        self.sampler.zones_sampled()
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}
