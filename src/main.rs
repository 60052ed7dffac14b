// Demo viewer for the damage overlay engine.
//
// Usage: damage-overlay <photo> [assessment.json]
//
// • The window opens with the damage overlay composited on the photo.
// • O toggles between the overlay and the plain photo.
// • R re-renders; with no ground-truth mask the zones reshuffle.
// • ESC quits.
//
// Without an assessment file a sample record is synthesized, which always
// exercises the procedural fallback path.

use std::path::{Path, PathBuf};

use damage_overlay::error::OverlayError;
use damage_overlay::render::{DisplayLayer, OverlayRenderer, RenderOutcome};
use damage_overlay::types::{
    AssessmentPayload, AssessmentResult, ResourceEstimate, Severity, SourceImage,
};
use damage_overlay::{decode, draw, scale};

fn main() -> Result<(), OverlayError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(photo_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: damage-overlay <photo> [assessment.json]");
        std::process::exit(2);
    };
    let assessment_path = args.next().map(PathBuf::from);

    /* --- Inputs ---
       The photo is decoded at natural size; the assessment either comes
       from the collaborator's JSON or is synthesized for the demo. */
    let source = decode::source_from_path(&photo_path)?;
    let assessment = match &assessment_path {
        Some(path) => load_assessment(path)?,
        None => sample_assessment(),
    };

    let (sw, sh) = source.dimensions();
    let display = scale::resolve(sw, sh, scale::MAX_DISPLAY_WIDTH)?;

    /* --- First render ---
       The preview is the un-overlaid photo at display size; toggling
       swaps between it and the composited surface. */
    let preview = draw::preview_pixels(&source, &display);
    let mut renderer = OverlayRenderer::new();
    let token = renderer.begin_render();
    let mut outcome = renderer.render(token, &source, &assessment)?;

    let mut viewer = draw::Viewer::new(
        "Damage Overlay",
        display.width as usize,
        display.height as usize,
    )?;

    /* ------------------------------ Main loop ------------------------------ */
    let mut frame = vec![0u32; preview.len()];
    while viewer.is_open() && !viewer.esc_pressed() {
        if viewer.o_pressed_once() {
            renderer.toggle_overlay();
        }
        if viewer.r_pressed_once() {
            let token = renderer.begin_render();
            outcome = renderer.render(token, &source, &assessment)?;
        }

        // Copy the chosen layer into the frame so HUD text never marks the
        // renderer-owned surface.
        match renderer.displayed() {
            DisplayLayer::Overlay(surface) => frame.copy_from_slice(&surface.pixels),
            DisplayLayer::Original => frame.copy_from_slice(&preview),
        }

        let hud = hud_line(&renderer, &assessment, outcome);
        draw::draw_text_5x7(
            &mut frame,
            display.width as usize,
            display.height as usize,
            8,
            8,
            &hud,
            0x00FF_FFFF,
        );

        viewer.present(&frame, display.width as usize, display.height as usize)?;
    }

    Ok(())
}

fn hud_line(
    renderer: &OverlayRenderer,
    assessment: &AssessmentResult,
    outcome: RenderOutcome,
) -> String {
    let layer = if renderer.overlay_visible() { "OVERLAY" } else { "ORIGINAL" };
    let path = match outcome {
        RenderOutcome::Rendered { used_mask: true } => "MASK",
        _ => "ZONES",
    };
    format!(
        "{} | {} {}% | {} | O:TOGGLE R:REDRAW",
        layer,
        assessment.severity.label(),
        assessment.damage_percentage,
        path,
    )
}

fn load_assessment(path: &Path) -> Result<AssessmentResult, OverlayError> {
    let bytes = std::fs::read(path)
        .map_err(|e| OverlayError::AssessmentRead(format!("read {}: {e}", path.display())))?;
    let payload: AssessmentPayload = serde_json::from_slice(&bytes)
        .map_err(|e| OverlayError::AssessmentRead(format!("parse {}: {e}", path.display())))?;
    Ok(AssessmentResult::from_payload(payload))
}

/// Stand-in record for running the demo without the assessment service.
fn sample_assessment() -> AssessmentResult {
    AssessmentResult {
        severity: Severity::Severe,
        damage_percentage: 62,
        affected_area_sq_m: 3400,
        segmentation_mask: None,
        resources: ResourceEstimate { personnel: 28, vehicles: 6 },
    }
}
