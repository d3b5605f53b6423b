//! Form, level and community listings.

use qrbadge_core::{CommunityList, EcLevel, FormState, LogoOutcome, RenderedArtifact};

/// Print the current form snapshot.
pub fn print_form(form: &FormState) {
    let payload = if form.payload.is_empty() { "(empty)" } else { form.payload.as_str() };
    println!("\x1b[1mPayload:\x1b[0m    {}", payload);
    println!("\x1b[1mLogo:\x1b[0m       {}", form.logo.describe());
    println!("\x1b[1mColors:\x1b[0m     {} on {}", form.foreground, form.background);
    println!(
        "\x1b[1mRecovery:\x1b[0m   {} ({})",
        form.level,
        form.level.recovery()
    );
}

/// Print the error correction table, marking the selected level.
pub fn print_levels(selected: Option<EcLevel>) {
    println!("\n\x1b[1mError correction levels\x1b[0m");
    println!("═══════════════════════════════════════");
    for level in EcLevel::ALL {
        let marker = if Some(level) == selected { "▸" } else { " " };
        println!("{} {}  {:<9} {:>4}", marker, level, level.name(), level.recovery());
    }
    println!();
}

/// Print the community list, marking the default.
pub fn print_communities(list: &CommunityList) {
    if list.is_empty() {
        println!("\x1b[2mNo communities available; logo defaults to none.\x1b[0m");
        return;
    }

    println!("\n\x1b[1mCommunities\x1b[0m");
    println!("═══════════════════════════════════════");
    for (index, community) in list.entries().iter().enumerate() {
        let marker = if Some(index) == list.default_index() { "\x1b[1;32m★\x1b[0m" } else { " " };
        let logo = community.logo_url().unwrap_or("(fallback logo)");
        println!("{} {:>3}  {}", marker, index, community.display_label(index));
        println!("        \x1b[2m{}\x1b[0m", logo);
    }
    println!();
}

/// One-line summary of a fresh artifact.
pub fn print_artifact_summary(artifact: &RenderedArtifact) {
    let logo = match artifact.logo {
        LogoOutcome::Requested => "requested logo",
        LogoOutcome::Fallback => "fallback logo",
        LogoOutcome::NoLogo => "no logo",
    };
    println!(
        "\x1b[1;32m✓\x1b[0m Generated ({}, level {} / {}, {} bytes PNG, {} bytes SVG)",
        logo,
        artifact.form.level,
        artifact.form.level.recovery(),
        artifact.png.len(),
        artifact.svg.len()
    );
    println!("\x1b[2mEncoded value: {}\x1b[0m", artifact.form.payload);
}
