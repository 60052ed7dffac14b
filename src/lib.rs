//! Damage overlay visualization engine.
//!
//! Renders a damage heat-map composite over a user-supplied disaster
//! photo, from an assessment record produced by an external assessment
//! service. Two rendering paths share a pipeline:
//!
//! - **Mask overlay**: when the service supplies a pixel-aligned
//!   segmentation mask, it is composited over the photo at constant
//!   0.6 alpha.
//! - **Procedural fallback**: without a usable mask, randomized radial
//!   damage zones approximate the reported damage percentage.
//!
//! The fallback is *not deterministic*: zone placement is freshly
//! randomized on every render, so repeated renders of the same assessment
//! look different (statistically similar). It is illustrative display
//! only — never use it for comparison or persistence. Hosts that need
//! reproducible output (tests, golden images) construct the renderer with
//! [`OverlayRenderer::with_seed`].
//!
//! The photo is only ever downscaled to fit a maximum display width,
//! never enlarged. Toggling overlay visibility swaps which pre-rendered
//! layer is shown and never triggers a re-render.

pub mod decode;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod render;
pub mod scale;
pub mod types;
pub mod zones;

pub use error::OverlayError;
pub use render::{DisplayLayer, LegendEntry, OverlayRenderer, RenderOutcome, RenderToken, legend};
pub use scale::{DisplaySize, MAX_DISPLAY_WIDTH, resolve};
pub use types::{
    AssessmentPayload, AssessmentResult, RenderSurface, ResourceEstimate, Severity, SourceImage,
};
