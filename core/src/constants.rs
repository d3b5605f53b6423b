//! Centralized rendering and source constants
//!
//! Geometry, palette and default locations used across the crate live here
//! so the raster and vector backends cannot drift apart.

/// Remote JSON array of community descriptors
pub const COMMUNITIES_URL: &str =
    "https://raw.githubusercontent.com/UAIBIT/OBTC/refs/heads/main/communities.json";

/// Brand string preferred when choosing the default community
pub const DEFAULT_COMMUNITY_SENTINEL: &str = "uaibit";

/// Name of the bundled logo used when the requested one cannot be loaded
pub const FALLBACK_LOGO_NAME: &str = "uaibitlogo.svg";

/// Bundled fallback logo, compiled in so it never depends on the working directory
pub const FALLBACK_LOGO_SVG: &[u8] = include_bytes!("../assets/uaibitlogo.svg");

/// Width and height of the rendered symbol in pixels
pub const SYMBOL_SIZE: u32 = 400;

/// Quiet zone around the symbol, in modules
pub const SYMBOL_MARGIN: u32 = 2;

/// Edge length of the square logo drawn inside the badge
pub const LOGO_SIZE: u32 = 80;

/// Gap between the logo clip circle and the badge edge
pub const BADGE_PADDING: u32 = 8;

/// Badge outline width
pub const BADGE_STROKE_WIDTH: f32 = 1.0;

/// Background luma above which the background counts as light
pub const LIGHT_LUMA_THRESHOLD: f32 = 128.0;

/// Badge outline on light backgrounds
pub const LIGHT_STROKE: &str = "#E5E7EB";

/// Badge outline on dark backgrounds
pub const DARK_STROKE: &str = "#374151";

/// Default module color
pub const DEFAULT_FOREGROUND: &str = "#000000";

/// Default quiet zone and light module color
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Prefix for exported file names
pub const EXPORT_PREFIX: &str = "uaibit-qr";

/// Directory exports land in when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Community list request timeout in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Per-candidate logo load timeout in seconds
pub const LOGO_TIMEOUT_SECS: u64 = 10;
