//! Badge geometry and palette shared by both backends
//!
//! Radius, clip region and colors are decided once here. The raster and
//! vector backends only translate this description into pixels or markup.

use crate::color::Color;
use crate::constants::{BADGE_STROKE_WIDTH, DARK_STROKE, LIGHT_STROKE};
use crate::render::RenderSettings;

/// Centered circular backdrop plus the clipped logo box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeGeometry {
    pub center: f32,
    /// Radius of the filled backdrop
    pub outer_radius: f32,
    /// Radius of the logo clip circle
    pub inner_radius: f32,
    /// Top-left corner of the square logo box, on both axes
    pub logo_origin: u32,
    pub logo_size: u32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl BadgeGeometry {
    pub fn new(settings: &RenderSettings, background: Color) -> Self {
        let (fill, stroke) = badge_palette(background);
        let half_logo = settings.logo_size as f32 / 2.0;

        Self {
            center: settings.size as f32 / 2.0,
            outer_radius: half_logo + settings.badge_padding as f32,
            inner_radius: half_logo,
            logo_origin: settings.size.saturating_sub(settings.logo_size) / 2,
            logo_size: settings.logo_size,
            fill,
            stroke,
            stroke_width: BADGE_STROKE_WIDTH,
        }
    }
}

/// Fill and stroke for a badge over the given background
///
/// The disc is always white; only the ring follows the background, light
/// gray on light backgrounds and dark gray on dark ones.
pub fn badge_palette(background: Color) -> (Color, Color) {
    let stroke = if background.is_light() { LIGHT_STROKE } else { DARK_STROKE };
    (Color::WHITE, parse_const(stroke))
}

fn parse_const(hex: &str) -> Color {
    Color::parse(hex).unwrap_or(Color::BLACK)
}
