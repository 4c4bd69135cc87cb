//! Analysis report PDF generation.
//!
//! `layout` owns page geometry, fonts and drawing primitives, `gauge` the
//! radial score dial, `renderer` the section-by-section assembly.

pub mod gauge;
pub mod layout;
pub mod renderer;

pub use renderer::{render_report, RenderError};
