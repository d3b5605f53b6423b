//! Raster backend: paints the symbol and badge into an RGBA surface

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Color;
use crate::render::badge::BadgeGeometry;
use crate::render::grid::{Layout, ModuleGrid};
use crate::Result;

/// Sample the module grid onto a square surface
pub fn render_symbol(grid: &ModuleGrid, layout: Layout, foreground: Color, background: Color) -> RgbaImage {
    let dark = foreground.to_rgba();
    let light = background.to_rgba();

    RgbaImage::from_fn(layout.size, layout.size, |px, py| {
        match layout.module_at(grid, px, py) {
            Some((x, y)) if grid.is_dark(x, y) => dark,
            _ => light,
        }
    })
}

/// Draw the backdrop disc, its outline, then the logo clipped to a circle
pub fn paint_badge(surface: &mut RgbaImage, badge: &BadgeGeometry, logo: &RgbaImage) {
    let reach = badge.outer_radius + badge.stroke_width;
    let lo = (badge.center - reach).floor().max(0.0) as u32;
    let hi = ((badge.center + reach).ceil() as u32).min(surface.width().min(surface.height()));

    let fill = badge.fill.to_rgba();
    let stroke = badge.stroke.to_rgba();
    let half_stroke = badge.stroke_width / 2.0;

    for py in lo..hi {
        for px in lo..hi {
            let d = distance(badge.center, px, py);
            let dst = surface.get_pixel_mut(px, py);

            blend(dst, fill, coverage(badge.outer_radius - d));
            blend(dst, stroke, coverage(half_stroke - (d - badge.outer_radius).abs()));
        }
    }

    let origin = badge.logo_origin;
    for (lx, ly, src) in logo.enumerate_pixels() {
        let (px, py) = (origin + lx, origin + ly);
        if px >= surface.width() || py >= surface.height() {
            continue;
        }
        let clip = coverage(badge.inner_radius - distance(badge.center, px, py));
        blend(surface.get_pixel_mut(px, py), *src, clip);
    }
}

/// Encode a surface as PNG bytes
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    surface.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// Distance from the circle center to a pixel's center
fn distance(center: f32, px: u32, py: u32) -> f32 {
    let dx = px as f32 + 0.5 - center;
    let dy = py as f32 + 0.5 - center;
    (dx * dx + dy * dy).sqrt()
}

/// Edge coverage for a signed distance inside a shape, one pixel of ramp
fn coverage(inside: f32) -> f32 {
    (inside + 0.5).clamp(0.0, 1.0)
}

/// Source-over compositing with straight alpha
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = src[3] as f32 / 255.0 * coverage;
    if alpha <= 0.0 {
        return;
    }

    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for c in 0..3 {
        let s = src[c] as f32 * alpha;
        let d = dst[c] as f32 * dst_alpha * (1.0 - alpha);
        dst[c] = ((s + d) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::EcLevel;
    use crate::render::RenderSettings;

    fn setup() -> (ModuleGrid, Layout, RenderSettings) {
        let settings = RenderSettings::default();
        let grid = ModuleGrid::encode("raster backend", EcLevel::H).unwrap();
        (grid, settings.layout(), settings)
    }

    #[test]
    fn test_symbol_uses_palette_and_size() {
        let (grid, layout, _) = setup();
        let fg = Color::parse("#112233").unwrap();
        let bg = Color::parse("#FAFAFA").unwrap();
        let img = render_symbol(&grid, layout, fg, bg);

        assert_eq!(img.dimensions(), (400, 400));
        // quiet zone
        assert_eq!(*img.get_pixel(1, 1), bg.to_rgba());
        assert!(img.pixels().any(|p| *p == fg.to_rgba()));
        assert!(img.pixels().all(|p| *p == fg.to_rgba() || *p == bg.to_rgba()));
    }

    #[test]
    fn test_badge_covers_center_only() {
        let (grid, layout, settings) = setup();
        let mut img = render_symbol(&grid, layout, Color::BLACK, Color::WHITE);
        let untouched = img.clone();
        let badge = BadgeGeometry::new(&settings, Color::WHITE);
        let logo = RgbaImage::from_pixel(80, 80, Rgba([255, 0, 0, 255]));

        paint_badge(&mut img, &badge, &logo);

        // logo center
        assert_eq!(*img.get_pixel(200, 200), Rgba([255, 0, 0, 255]));
        // inside the padding ring, outside the logo clip
        assert_eq!(*img.get_pixel(200, 200 - 44), Rgba([255, 255, 255, 255]));
        // logo box corner is clipped away and shows the backdrop
        assert_eq!(*img.get_pixel(230, 230), Rgba([255, 255, 255, 255]));
        // far from the badge nothing changes
        assert_eq!(img.get_pixel(10, 10), untouched.get_pixel(10, 10));
        assert_eq!(img.get_pixel(200, 140), untouched.get_pixel(200, 140));
    }

    #[test]
    fn test_transparent_logo_keeps_backdrop() {
        let (grid, layout, settings) = setup();
        let mut img = render_symbol(&grid, layout, Color::BLACK, Color::WHITE);
        let badge = BadgeGeometry::new(&settings, Color::WHITE);
        let logo = RgbaImage::from_pixel(80, 80, Rgba([0, 0, 0, 0]));

        paint_badge(&mut img, &badge, &logo);
        assert_eq!(*img.get_pixel(200, 200), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_encoding_is_stable() {
        let (grid, layout, _) = setup();
        let img = render_symbol(&grid, layout, Color::BLACK, Color::WHITE);
        let a = encode_png(&img).unwrap();
        let b = encode_png(&img).unwrap();
        assert_eq!(a, b);
        assert_eq!(image::guess_format(&a).unwrap(), ImageFormat::Png);
    }
}
