//! qrbadge core - QR codes with a composited logo badge
//!
//! This library renders a payload as a QR symbol with an optional circular
//! logo badge in its center, producing matching PNG and SVG artifacts. Logos
//! come from a remote community list, an uploaded image, or a fixed fallback.

pub mod color;
pub mod community;
pub mod constants;
pub mod export;
pub mod form;
pub mod render;
pub mod studio;

mod error;

use std::path::PathBuf;
use std::time::Duration;

pub use error::{Error, Result};

/// Configuration for the generator
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote JSON array of community descriptors
    pub communities_url: String,
    /// Logo used when the requested one fails (URL or path); `None` uses the
    /// bundled logo
    pub fallback_logo: Option<String>,
    /// Directory exported files are written to
    pub output_dir: PathBuf,
    /// Exported file name prefix
    pub file_prefix: String,
    /// Symbol edge length in pixels
    pub symbol_size: u32,
    /// Quiet zone in modules
    pub margin: u32,
    /// Logo edge length in pixels
    pub logo_size: u32,
    /// Space between logo clip circle and badge edge
    pub badge_padding: u32,
    pub fetch_timeout: Duration,
    pub logo_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            communities_url: constants::COMMUNITIES_URL.to_string(),
            fallback_logo: None,
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            file_prefix: constants::EXPORT_PREFIX.to_string(),
            symbol_size: constants::SYMBOL_SIZE,
            margin: constants::SYMBOL_MARGIN,
            logo_size: constants::LOGO_SIZE,
            badge_padding: constants::BADGE_PADDING,
            fetch_timeout: Duration::from_secs(constants::FETCH_TIMEOUT_SECS),
            logo_timeout: Duration::from_secs(constants::LOGO_TIMEOUT_SECS),
        }
    }
}

// Re-export key types for convenience
pub use color::Color;
pub use community::{CommunityDescriptor, CommunityList, CommunityLoader};
pub use export::{ExportFormat, Exporter};
pub use form::{EcLevel, FormState, LogoSource, UploadedImage};
pub use render::{LogoOutcome, RenderedArtifact, Renderer};
pub use studio::{Studio, StudioEvent};
