//! Logo-compositing renderer
//!
//! One generation pass encodes the payload once, resolves the logo once
//! through the candidate cascade, computes one [`BadgeGeometry`], and hands
//! all three to the raster and vector backends. Both artifacts therefore
//! always describe the same snapshot.

pub mod badge;
pub mod grid;
pub mod logo;
pub mod raster;
pub mod vector;

use serde::Serialize;

pub use badge::BadgeGeometry;
pub use grid::{Layout, ModuleGrid};
pub use logo::{LoadedLogo, LogoCandidate, LogoLoader, LogoOutcome};

use crate::constants::{BADGE_PADDING, LOGO_SIZE, SYMBOL_MARGIN, SYMBOL_SIZE};
use crate::form::{FormState, LogoSource};
use crate::{Config, Result};

/// Fixed symbol and badge dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub size: u32,
    pub margin: u32,
    pub logo_size: u32,
    pub badge_padding: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: SYMBOL_SIZE,
            margin: SYMBOL_MARGIN,
            logo_size: LOGO_SIZE,
            badge_padding: BADGE_PADDING,
        }
    }
}

impl RenderSettings {
    pub fn layout(&self) -> Layout {
        Layout {
            size: self.size,
            margin: self.margin,
        }
    }
}

impl From<&Config> for RenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            size: config.symbol_size,
            margin: config.margin,
            logo_size: config.logo_size,
            badge_padding: config.badge_padding,
        }
    }
}

/// Raster and vector output of one generation pass
#[derive(Debug, Clone, Serialize)]
pub struct RenderedArtifact {
    /// Snapshot the artifact was produced from
    pub form: FormState,
    #[serde(skip_serializing)]
    pub png: Vec<u8>,
    #[serde(skip_serializing)]
    pub svg: String,
    pub logo: LogoOutcome,
}

/// Turns form snapshots into artifacts
pub struct Renderer {
    settings: RenderSettings,
    loader: LogoLoader,
    fallback: LogoCandidate,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        let settings = RenderSettings::from(config);
        Self {
            settings,
            loader: LogoLoader::new(config.logo_timeout, settings.logo_size),
            fallback: config
                .fallback_logo
                .as_deref()
                .map(LogoCandidate::from_config)
                .unwrap_or_else(LogoCandidate::bundled),
        }
    }

    /// Ordered logo candidates for a snapshot
    ///
    /// A community without a usable logo URL goes straight to the fallback,
    /// and "no logo" yields an empty list.
    pub fn candidates(&self, logo: &LogoSource) -> Vec<(LogoCandidate, LogoOutcome)> {
        let fallback = (self.fallback.clone(), LogoOutcome::Fallback);
        match logo {
            LogoSource::None => Vec::new(),
            LogoSource::Community(community) => {
                let requested = community.logo_url().and_then(|reference| {
                    let candidate = LogoCandidate::from_remote(reference);
                    if candidate.is_none() {
                        tracing::warn!("ignoring non-URL community logo {:?}", reference);
                    }
                    candidate
                });
                match requested {
                    Some(candidate) => vec![(candidate, LogoOutcome::Requested), fallback],
                    None => vec![fallback],
                }
            }
            LogoSource::Uploaded(upload) => vec![
                (
                    LogoCandidate::Inline {
                        name: upload.file_name.clone(),
                        bytes: upload.bytes.clone(),
                    },
                    LogoOutcome::Requested,
                ),
                fallback,
            ],
        }
    }

    /// Run a full generation pass
    ///
    /// Returns `Ok(None)` for a blank payload. Logo failures never surface
    /// here; only encoding failures do.
    pub async fn render(&self, form: &FormState) -> Result<Option<RenderedArtifact>> {
        if !form.can_generate() {
            tracing::debug!("blank payload, nothing to render");
            return Ok(None);
        }

        // encode first so an oversized payload fails before any logo I/O
        let grid = ModuleGrid::encode(&form.payload, form.level)?;
        let logo = self.loader.load_first(&self.candidates(&form.logo)).await;
        self.compose(form, &grid, logo.as_ref()).map(Some)
    }

    /// Synchronous half of a pass, once the logo is resolved
    pub fn compose(
        &self,
        form: &FormState,
        grid: &ModuleGrid,
        logo: Option<&LoadedLogo>,
    ) -> Result<RenderedArtifact> {
        let layout = self.settings.layout();
        let badge = logo.map(|l| (BadgeGeometry::new(&self.settings, form.background), l));

        let mut surface = raster::render_symbol(grid, layout, form.foreground, form.background);
        if let Some((geometry, logo)) = &badge {
            raster::paint_badge(&mut surface, geometry, &logo.pixels);
        }
        let png = raster::encode_png(&surface)?;

        let svg = vector::render_svg(
            grid,
            layout,
            form.foreground,
            form.background,
            badge.as_ref().map(|(g, l)| (g, *l)),
        );

        let outcome = logo.map(|l| l.outcome).unwrap_or(LogoOutcome::NoLogo);
        tracing::info!(
            "rendered {} modules at level {} with {:?}",
            grid.width(),
            form.level,
            outcome
        );

        Ok(RenderedArtifact {
            form: form.clone(),
            png,
            svg,
            logo: outcome,
        })
    }
}
