//! Vector backend: serializes the symbol and badge as an SVG document

use std::fmt::Write as _;

use crate::color::Color;
use crate::render::badge::BadgeGeometry;
use crate::render::grid::{Layout, ModuleGrid};
use crate::render::logo::LoadedLogo;

const CLIP_ID: &str = "qrbadge-logo-clip";

/// Build the full SVG document
///
/// Modules are drawn in a nested viewport measured in module units so the
/// path stays integral; the badge uses the outer pixel coordinates.
pub fn render_svg(
    grid: &ModuleGrid,
    layout: Layout,
    foreground: Color,
    background: Color,
    badge: Option<(&BadgeGeometry, &LoadedLogo)>,
) -> String {
    let size = layout.size;
    let span = layout.span(grid);

    let mut svg = String::new();
    svg += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\">",
        size
    );
    let _ = writeln!(svg, "\t<rect width=\"{0}\" height=\"{0}\" fill=\"{1}\"/>", size, background);
    let _ = writeln!(
        svg,
        "\t<svg width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" shape-rendering=\"crispEdges\">",
        size, span
    );
    let _ = writeln!(
        svg,
        "\t\t<path fill=\"{}\" d=\"{}\"/>",
        foreground,
        module_path(grid, layout.margin as usize)
    );
    svg += "\t</svg>\n";

    if let Some((geometry, logo)) = badge {
        svg += &badge_markup(geometry, logo);
    }

    svg += "</svg>\n";
    svg
}

/// Dark modules as one path, horizontal runs merged
fn module_path(grid: &ModuleGrid, margin: usize) -> String {
    let mut d = String::new();
    for y in 0..grid.width() {
        let mut x = 0;
        while x < grid.width() {
            if !grid.is_dark(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < grid.width() && grid.is_dark(x, y) {
                x += 1;
            }
            let run = x - start;
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = write!(d, "M{},{}h{}v1h-{}z", start + margin, y + margin, run, run);
        }
    }
    d
}

fn badge_markup(badge: &BadgeGeometry, logo: &LoadedLogo) -> String {
    let mut g = String::new();
    g += "\t<g>\n";
    let _ = writeln!(
        g,
        "\t\t<defs><clipPath id=\"{}\"><circle cx=\"{2}\" cy=\"{2}\" r=\"{1}\"/></clipPath></defs>",
        CLIP_ID, badge.inner_radius, badge.center
    );
    let _ = writeln!(
        g,
        "\t\t<circle cx=\"{0}\" cy=\"{0}\" r=\"{1}\" fill=\"{2}\" stroke=\"{3}\" stroke-width=\"{4}\"/>",
        badge.center, badge.outer_radius, badge.fill, badge.stroke, badge.stroke_width
    );
    let _ = writeln!(
        g,
        "\t\t<image x=\"{0}\" y=\"{0}\" width=\"{1}\" height=\"{1}\" preserveAspectRatio=\"none\" clip-path=\"url(#{2})\" href=\"{3}\"/>",
        badge.logo_origin,
        badge.logo_size,
        CLIP_ID,
        logo.data_url()
    );
    g += "\t</g>\n";
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::EcLevel;
    use crate::render::logo::LogoOutcome;
    use crate::render::RenderSettings;
    use image::RgbaImage;
    use std::sync::Arc;

    fn logo() -> LoadedLogo {
        LoadedLogo {
            bytes: Arc::from(&b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"[..]),
            mime: "image/svg+xml",
            pixels: RgbaImage::new(80, 80),
            outcome: LogoOutcome::Requested,
        }
    }

    #[test]
    fn test_bare_document_shape() {
        let grid = ModuleGrid::encode("vector", EcLevel::Q).unwrap();
        let layout = RenderSettings::default().layout();
        let svg = render_svg(&grid, layout, Color::BLACK, Color::WHITE, None);

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 400 400\""));
        // SVG 2 document: plain href, no 1.1 version claim
        assert!(!svg.contains("version=\"1.1\""));
        assert!(svg.contains(&format!("viewBox=\"0 0 {0} {0}\"", grid.width() + 4)));
        assert!(svg.contains("fill=\"#FFFFFF\""));
        assert!(svg.contains("<path fill=\"#000000\" d=\"M2,2h7v1h-7z"));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn test_badge_primitives() {
        let settings = RenderSettings::default();
        let grid = ModuleGrid::encode("vector", EcLevel::H).unwrap();
        let background = Color::parse("#1F2937").unwrap();
        let badge = BadgeGeometry::new(&settings, background);
        let svg = render_svg(&grid, settings.layout(), Color::WHITE, background, Some((&badge, &logo())));

        assert!(svg.contains("<circle cx=\"200\" cy=\"200\" r=\"40\"/>"));
        assert!(svg.contains("r=\"48\" fill=\"#FFFFFF\" stroke=\"#374151\" stroke-width=\"1\""));
        assert!(svg.contains("<image x=\"160\" y=\"160\" width=\"80\" height=\"80\""));
        assert!(svg.contains("href=\"data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_path_counts_every_dark_module() {
        let grid = ModuleGrid::encode("count me", EcLevel::L).unwrap();
        let d = module_path(&grid, 2);
        let covered: usize = d
            .split(' ')
            .map(|seg| {
                let h = seg.split('h').nth(1).unwrap();
                h.split('v').next().unwrap().parse::<usize>().unwrap()
            })
            .sum();
        let dark = (0..grid.width())
            .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.is_dark(x, y))
            .count();
        assert_eq!(covered, dark);
    }
}
