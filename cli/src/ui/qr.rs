//! Terminal preview of a generated symbol.

use qrbadge_core::render::ModuleGrid;
use qrbadge_core::FormState;

/// Print the symbol for a snapshot to the terminal.
///
/// Uses Unicode block characters for compact display where
/// each character represents 2 vertical modules. The badge is
/// not drawn; the preview only shows the module pattern.
pub fn print_preview(form: &FormState) {
    let grid = match ModuleGrid::encode(&form.payload, form.level) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to generate QR code: {}", e);
            return;
        }
    };

    let width = grid.width();
    let quiet = "  ";

    // Top quiet zone
    println!("{}{}", quiet, " ".repeat(width + 4));

    for y in (0..width).step_by(2) {
        print!("{}  ", quiet);
        for x in 0..width {
            let top = grid.is_dark(x, y);
            let bottom = grid.is_dark(x, y + 1);

            let ch = match (top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            };
            print!("{}", ch);
        }
        println!("  ");
    }

    // Bottom quiet zone
    println!("{}{}", quiet, " ".repeat(width + 4));
}
