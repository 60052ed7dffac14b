// Display-size resolution: fit the source photo under a maximum display
// width without ever enlarging it.

use crate::error::OverlayError;

/// Default cap on the displayed width, in drawable units.
pub const MAX_DISPLAY_WIDTH: u32 = 800;

/// Resolved display geometry for one (source, max width) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    /// Uniform scale factor applied to the source; always <= 1.0.
    pub scale: f32,
    pub width: u32,
    pub height: u32,
}

/// Compute `scale = min(max_display_width / source_width, 1.0)` and the
/// resulting display dimensions, rounded to the nearest drawable unit.
///
/// Pure; the only failure mode is a non-positive dimension.
pub fn resolve(
    source_width: u32,
    source_height: u32,
    max_display_width: u32,
) -> Result<DisplaySize, OverlayError> {
    if source_width == 0 || source_height == 0 || max_display_width == 0 {
        return Err(OverlayError::InvalidDimensions {
            width: source_width,
            height: source_height,
        });
    }

    let scale = (max_display_width as f32 / source_width as f32).min(1.0);
    let width = (source_width as f32 * scale).round().max(1.0) as u32;
    let height = (source_height as f32 * scale).round().max(1.0) as u32;

    Ok(DisplaySize { scale, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_source_is_downscaled() {
        let size = resolve(1600, 1200, 800).unwrap();
        assert_eq!(size.scale, 0.5);
        assert_eq!(size.width, 800);
        assert_eq!(size.height, 600);
    }

    #[test]
    fn narrow_source_is_never_enlarged() {
        let size = resolve(640, 480, 800).unwrap();
        assert_eq!(size.scale, 1.0);
        assert_eq!(size.width, 640);
        assert_eq!(size.height, 480);
    }

    #[test]
    fn source_exactly_at_cap_keeps_scale_one() {
        let size = resolve(800, 533, 800).unwrap();
        assert_eq!(size.scale, 1.0);
        assert_eq!(size.width, 800);
        assert_eq!(size.height, 533);
    }

    #[test]
    fn scale_stays_below_one_for_all_oversized_widths() {
        for w in [801u32, 1000, 1920, 4000, 12000] {
            let size = resolve(w, 1000, 800).unwrap();
            assert!(size.scale < 1.0, "width {w} should downscale");
            assert_eq!(size.width, 800);
        }
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert!(resolve(0, 100, 800).is_err());
        assert!(resolve(100, 0, 800).is_err());
        assert!(resolve(100, 100, 0).is_err());
    }

    #[test]
    fn tiny_sources_keep_at_least_one_unit() {
        // A 1-pixel-tall strip must still produce a drawable surface.
        let size = resolve(3000, 1, 800).unwrap();
        assert!(size.height >= 1);
    }
}
