//! UI utilities for terminal output.

mod banner;
mod form;
mod qr;

pub use banner::print_banner;
pub use form::{print_artifact_summary, print_communities, print_form, print_levels};
pub use qr::print_preview;
