//! One-shot generate command.

use anyhow::{bail, Context};
use qrbadge_core::Studio;

use crate::ui::{print_artifact_summary, print_preview};
use crate::GenerateArgs;

/// Build a form from arguments, generate once and save.
pub async fn run_generate(config: qrbadge_core::Config, args: GenerateArgs) -> anyhow::Result<()> {
    let studio = Studio::new(config);

    if !args.no_logo && args.logo.is_none() {
        studio.load_communities().await;
    }
    if let Some(query) = &args.community {
        if studio.select_community(query).await.is_none() {
            bail!("no community matches {:?}", query);
        }
    }
    if let Some(path) = &args.logo {
        studio
            .upload_logo(path)
            .await
            .with_context(|| format!("failed to read logo {}", path.display()))?;
    }
    if args.no_logo {
        studio.clear_logo().await;
    }

    let form = studio
        .update_form(|f| {
            f.with_payload(args.payload.clone())
                .with_colors(args.fg, args.bg)
                .with_level(args.ec)
        })
        .await;

    if !form.can_generate() {
        bail!("nothing to encode: payload is blank");
    }
    if args.preview {
        print_preview(&form);
    }

    let Some(artifact) = studio.generate().await else {
        bail!("QR code generation failed");
    };
    print_artifact_summary(&artifact);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
    }

    for path in studio.export(args.format).await? {
        println!("  \x1b[1;34m↓\x1b[0m {}", path.display());
    }
    Ok(())
}
