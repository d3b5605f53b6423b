//! Communities and levels commands.

use qrbadge_core::{CommunityLoader, Config};

use crate::ui::{print_communities, print_levels};

/// Fetch and display the community list.
pub async fn list_communities(config: Config) {
    let loader = CommunityLoader::new(&config);
    println!("\x1b[2mFetching {}\x1b[0m", loader.url());
    let list = loader.load().await;
    print_communities(&list);
}

/// Display the error correction table.
pub fn show_levels() {
    print_levels(None);
}
