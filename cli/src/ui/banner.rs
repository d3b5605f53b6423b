//! Startup banner.

use qrbadge_core::constants::{LOGO_SIZE, SYMBOL_SIZE};
use qrbadge_core::EcLevel;

/// Finder-pattern mark next to the app name and render defaults
fn banner_lines() -> [String; 3] {
    let level = EcLevel::default();
    [
        "█▀▀▀█".to_string(),
        "█ ● █  \x1b[1mqrbadge\x1b[0m".to_string(),
        format!(
            "▀▀▀▀▀  \x1b[2m{0}×{0} QR, {1}px logo badge, level {2} ({3})\x1b[0m",
            SYMBOL_SIZE,
            LOGO_SIZE,
            level,
            level.recovery()
        ),
    ]
}

/// Print the application banner.
pub fn print_banner() {
    println!();
    for line in banner_lines() {
        println!("  \x1b[1;36m{}\x1b[0m", line);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_shows_render_defaults() {
        let lines = banner_lines();
        assert!(lines[1].contains("qrbadge"));
        assert!(lines[2].contains("400×400 QR"));
        assert!(lines[2].contains("80px logo badge"));
        assert!(lines[2].contains("level H (30%)"));
    }
}
