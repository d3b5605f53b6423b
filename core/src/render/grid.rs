//! Module matrix produced by the QR encoder, and its pixel layout

use qrcode::{Color as ModuleColor, QrCode};

use crate::form::EcLevel;
use crate::Result;

/// Square matrix of dark/light modules, quiet zone excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    width: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Encode a payload at a fixed error-correction level
    pub fn encode(payload: &str, level: EcLevel) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into())?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == ModuleColor::Dark)
            .collect();
        Ok(Self { width, modules })
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    /// Dark test; anything outside the matrix is light
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

/// Placement of a grid on a square surface of `size` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: u32,
    pub margin: u32,
}

impl Layout {
    /// Modules per side including the quiet zone on both edges
    pub fn span(&self, grid: &ModuleGrid) -> u32 {
        grid.width() as u32 + 2 * self.margin
    }

    /// Module under a pixel, or `None` inside the quiet zone
    ///
    /// Integer arithmetic keeps the sampling exact: pixel `p` lands in
    /// cell `floor(p * span / size)` of the padded grid.
    pub fn module_at(&self, grid: &ModuleGrid, px: u32, py: u32) -> Option<(usize, usize)> {
        let span = self.span(grid) as u64;
        let size = self.size as u64;
        let cx = px as u64 * span / size;
        let cy = py as u64 * span / size;
        let margin = self.margin as u64;
        let width = grid.width() as u64;

        if cx < margin || cy < margin || cx >= margin + width || cy >= margin + width {
            return None;
        }
        Some(((cx - margin) as usize, (cy - margin) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_deterministic() {
        let a = ModuleGrid::encode("https://example.com", EcLevel::H).unwrap();
        let b = ModuleGrid::encode("https://example.com", EcLevel::H).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width() % 4, 1);
    }

    #[test]
    fn test_higher_level_never_shrinks() {
        let low = ModuleGrid::encode("The quick brown fox jumps over the lazy dog", EcLevel::L).unwrap();
        let high = ModuleGrid::encode("The quick brown fox jumps over the lazy dog", EcLevel::H).unwrap();
        assert!(high.width() >= low.width());
    }

    #[test]
    fn test_finder_corner_is_dark() {
        let grid = ModuleGrid::encode("hello", EcLevel::M).unwrap();
        assert!(grid.is_dark(0, 0));
        assert!(!grid.is_dark(grid.width(), 0));
        assert!(!grid.is_dark(0, grid.width()));
    }

    #[test]
    fn test_layout_quiet_zone_and_edges() {
        let grid = ModuleGrid::encode("hello", EcLevel::M).unwrap();
        let layout = Layout { size: 400, margin: 2 };
        assert_eq!(layout.module_at(&grid, 0, 0), None);
        assert_eq!(layout.module_at(&grid, 399, 399), None);

        let span = layout.span(&grid);
        // first pixel of the first module cell
        let first = (2 * 400 + span - 1) / span;
        assert_eq!(layout.module_at(&grid, first, first), Some((0, 0)));
    }

    #[test]
    fn test_too_long_payload_fails() {
        let payload = "x".repeat(5000);
        assert!(ModuleGrid::encode(&payload, EcLevel::H).is_err());
    }
}
