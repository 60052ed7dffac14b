// Core data model: what the assessment collaborator hands us, and the
// raster targets the renderer draws into.

use serde::Deserialize;

use crate::error::OverlayError;

/// Severity tier assigned by the external assessment service.
///
/// The service sends a free-form string; anything we don't recognize maps
/// to `Unknown` so a misbehaving collaborator never blocks rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Critical,
    Unknown,
}

impl Severity {
    /// Case-insensitive parse of the collaborator's severity string.
    pub fn parse(s: &str) -> Severity {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" => Severity::Minor,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    /// Display color for this tier, `None` for `Unknown` (no tier coloring).
    pub fn color(self) -> Option<(u8, u8, u8)> {
        match self {
            Severity::Minor => Some((234, 179, 8)),     // yellow
            Severity::Moderate => Some((249, 115, 22)), // orange
            Severity::Severe => Some((220, 38, 38)),    // red
            Severity::Critical => Some((153, 27, 27)),  // dark red
            Severity::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

/// Structured resource counts from the collaborator. Display-only: the
/// renderer never reads these, the host shows them next to the image.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResourceEstimate {
    pub personnel: u32,
    pub vehicles: u32,
}

/// Wire shape of one assessment response (camelCase JSON).
///
/// Raw and untrusted: `damage_percentage` may be out of range here, the
/// severity is still a string. Convert with [`AssessmentResult::from_payload`]
/// before handing it to the renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    #[serde(default)]
    pub severity: Option<String>,
    pub damage_percentage: i64,
    #[serde(default)]
    pub affected_area: u64,
    #[serde(default)]
    pub segmentation_mask: Option<String>,
    #[serde(default)]
    pub resources: ResourceEstimate,
}

/// One assessment record, validated and immutable once produced.
#[derive(Debug, Clone)]
pub struct AssessmentResult {
    pub severity: Severity,
    /// Clamped to 0..=100 at construction.
    pub damage_percentage: u8,
    /// Display-only, not used by the renderer.
    pub affected_area_sq_m: u64,
    /// Base64 (optionally data-URL) encoded raster, pixel-aligned to the
    /// unscaled source image. Present only when the service has ground truth.
    pub segmentation_mask: Option<String>,
    pub resources: ResourceEstimate,
}

impl AssessmentResult {
    /// Validate a wire payload: clamp the damage percentage into [0,100]
    /// and map an absent/unrecognized severity string to `Unknown`.
    pub fn from_payload(payload: AssessmentPayload) -> AssessmentResult {
        AssessmentResult {
            severity: payload
                .severity
                .as_deref()
                .map(Severity::parse)
                .unwrap_or(Severity::Unknown),
            damage_percentage: payload.damage_percentage.clamp(0, 100) as u8,
            affected_area_sq_m: payload.affected_area,
            segmentation_mask: payload.segmentation_mask,
            resources: payload.resources,
        }
    }
}

/// The user-selected disaster photo, decoded to RGBA at its natural size.
/// Immutable for the duration of one assessment cycle.
pub struct SourceImage {
    image: image::RgbaImage,
}

impl SourceImage {
    pub fn new(image: image::RgbaImage) -> Result<SourceImage, OverlayError> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(OverlayError::InvalidDimensions { width: w, height: h });
        }
        Ok(SourceImage { image })
    }

    /// Natural (unscaled) pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub(crate) fn rgba(&self) -> &image::RgbaImage {
        &self.image
    }
}

/// The mutable drawing target the overlay is composited onto.
///
/// Owned exclusively by the renderer; re-created (cleared, resized) on
/// every new (image, assessment) pair and never shared across renders.
/// Pixels are packed `0x00RRGGBB`, ready for a minifb-style window.
#[derive(Clone)]
pub struct RenderSurface {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl RenderSurface {
    /// Fresh all-black surface at the resolved display size.
    pub fn new(width: u32, height: u32) -> RenderSurface {
        RenderSurface {
            width: width as usize,
            height: height as usize,
            pixels: vec![0u32; width as usize * height as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(Severity::parse("Severe"), Severity::Severe);
        assert_eq!(Severity::parse("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::parse("  minor "), Severity::Minor);
        assert_eq!(Severity::parse("moderate"), Severity::Moderate);
    }

    #[test]
    fn unrecognized_severity_is_unknown_with_no_color() {
        let s = Severity::parse("catastrophic");
        assert_eq!(s, Severity::Unknown);
        assert!(s.color().is_none());
    }

    #[test]
    fn payload_damage_percentage_is_clamped() {
        let over = AssessmentResult::from_payload(AssessmentPayload {
            severity: Some("Severe".into()),
            damage_percentage: 250,
            affected_area: 1200,
            segmentation_mask: None,
            resources: ResourceEstimate::default(),
        });
        assert_eq!(over.damage_percentage, 100);

        let under = AssessmentResult::from_payload(AssessmentPayload {
            severity: None,
            damage_percentage: -5,
            affected_area: 0,
            segmentation_mask: None,
            resources: ResourceEstimate::default(),
        });
        assert_eq!(under.damage_percentage, 0);
        assert_eq!(under.severity, Severity::Unknown);
    }

    #[test]
    fn payload_deserializes_collaborator_json() {
        let json = r#"{
            "severity": "Moderate",
            "damagePercentage": 48,
            "affectedArea": 3200,
            "segmentationMask": null,
            "resources": { "personnel": 24, "vehicles": 5 }
        }"#;
        let payload: AssessmentPayload = serde_json::from_str(json).unwrap();
        let result = AssessmentResult::from_payload(payload);
        assert_eq!(result.severity, Severity::Moderate);
        assert_eq!(result.damage_percentage, 48);
        assert_eq!(result.affected_area_sq_m, 3200);
        assert_eq!(result.resources.personnel, 24);
        assert_eq!(result.resources.vehicles, 5);
        assert!(result.segmentation_mask.is_none());
    }

    #[test]
    fn source_image_rejects_zero_dimensions() {
        let img = image::RgbaImage::new(0, 10);
        assert!(SourceImage::new(img).is_err());
    }
}
