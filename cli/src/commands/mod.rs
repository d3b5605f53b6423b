//! CLI command implementations.

mod communities;
mod generate;
mod interactive;

pub use communities::{list_communities, show_levels};
pub use generate::run_generate;
pub use interactive::run_interactive;
