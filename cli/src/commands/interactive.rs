//! Interactive form session.

use std::path::PathBuf;
use std::sync::Arc;

use qrbadge_core::{Color, Config, EcLevel, ExportFormat, Studio, StudioEvent};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::ui::{
    print_artifact_summary, print_banner, print_communities, print_form, print_levels, print_preview,
};

const HELP: &str = "\
  <text>                 set the payload and generate
  <enter>                regenerate with the current form
  :ec <L|M|Q|H>          error correction level
  :fg <color>            module color (#RRGGBB or name)
  :bg <color>            background color
  :community <name|idx>  use a community logo
  :logo <path>           upload a logo image
  :nologo                render without a logo
  :save [png|svg|both]   save the current QR code
  :show                  show the form and generation status
  :list                  list communities
  :levels                show error correction levels
  :help                  this help
  :quit                  leave";

/// One line of user input.
#[derive(Debug, PartialEq)]
enum Input {
    Generate(Option<String>),
    Level(EcLevel),
    Foreground(Color),
    Background(Color),
    Community(String),
    Logo(PathBuf),
    NoLogo,
    Save(ExportFormat),
    Show,
    List,
    Levels,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(if line.trim().is_empty() {
            Input::Generate(None)
        } else {
            Input::Generate(Some(line.to_string()))
        });
    };

    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };
    let required = |what: &str| {
        if arg.is_empty() {
            Err(format!(":{} needs {}", name, what))
        } else {
            Ok(arg)
        }
    };

    match name {
        "ec" => required("a level")?.parse().map(Input::Level).map_err(|e| e.to_string()),
        "fg" => Color::parse(required("a color")?).map(Input::Foreground).map_err(|e| e.to_string()),
        "bg" => Color::parse(required("a color")?).map(Input::Background).map_err(|e| e.to_string()),
        "community" => required("a name or index").map(|a| Input::Community(a.to_string())),
        "logo" => required("a path").map(|a| Input::Logo(PathBuf::from(a))),
        "nologo" => Ok(Input::NoLogo),
        "save" if arg.is_empty() => Ok(Input::Save(ExportFormat::Both)),
        "save" => arg.parse().map(Input::Save).map_err(|e: qrbadge_core::Error| e.to_string()),
        "show" => Ok(Input::Show),
        "list" => Ok(Input::List),
        "levels" => Ok(Input::Levels),
        "help" | "h" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command :{} (try :help)", other)),
    }
}

/// Run the interactive session until `:quit`, EOF or Ctrl+C.
pub async fn run_interactive(config: Config) -> anyhow::Result<()> {
    print_banner();

    let mut studio = Studio::new(config);
    let mut events = studio.subscribe();
    let studio = Arc::new(studio);
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            handle_event(event);
        }
    });

    println!("\x1b[2mLoading communities...\x1b[0m");
    studio.load_communities().await;
    print_form(&studio.form().await);
    println!("\n\x1b[2mType text to encode, :help for commands.\x1b[0m\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle_input(&studio, input).await,
                    Err(message) => eprintln!("\x1b[1;31m✗\x1b[0m {}", message),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n\x1b[1;33mShutting down...\x1b[0m");
                break;
            }
        }
    }

    Ok(())
}

async fn handle_input(studio: &Arc<Studio>, input: Input) {
    match input {
        Input::Generate(payload) => {
            if let Some(payload) = payload {
                studio.update_form(|f| f.with_payload(payload)).await;
            }
            let form = studio.form().await;
            if !form.can_generate() {
                println!("\x1b[2mEnter some text to encode first.\x1b[0m");
                return;
            }
            if studio.is_generating() {
                println!("\x1b[2mQueued behind the running generation...\x1b[0m");
            }

            // logo loads can be slow; keep the prompt responsive
            let studio = studio.clone();
            tokio::spawn(async move {
                if let Some(artifact) = studio.generate_snapshot(form).await {
                    print_preview(&artifact.form);
                    print_artifact_summary(&artifact);
                }
            });
        }
        Input::Level(level) => {
            studio.update_form(|f| f.with_level(level)).await;
            println!("Error correction {} recovers {}", level, level.recovery());
        }
        Input::Foreground(color) => {
            studio.update_form(|f| f.with_foreground(color)).await;
        }
        Input::Background(color) => {
            studio.update_form(|f| f.with_background(color)).await;
        }
        Input::Community(query) => match studio.select_community(&query).await {
            Some(c) => println!("Logo: {}", c.label().unwrap_or("(unnamed)")),
            None => eprintln!("\x1b[1;31m✗\x1b[0m No community matches {:?}", query),
        },
        Input::Logo(path) => match studio.upload_logo(&path).await {
            Ok(upload) => println!("Logo: {} ({})", upload.file_name, upload.mime),
            Err(e) => eprintln!("\x1b[1;31m✗\x1b[0m {}", e),
        },
        Input::NoLogo => {
            studio.clear_logo().await;
            println!("Logo: none");
        }
        Input::Save(format) => {
            if studio.is_generating() {
                println!("\x1b[1;33m!\x1b[0m Still generating; saving the previous QR code.");
            }
            match studio.export(format).await {
                Ok(paths) if paths.is_empty() => println!("\x1b[2mNothing generated yet.\x1b[0m"),
                Ok(_) => {}
                Err(e) => eprintln!("\x1b[1;31m✗\x1b[0m Save failed: {}", e),
            }
        }
        Input::Show => {
            print_form(&studio.form().await);
            let status = if studio.is_generating() { "generating..." } else { "idle" };
            println!("\x1b[1mStatus:\x1b[0m     {}", status);
        }
        Input::List => print_communities(&studio.communities().await),
        Input::Levels => print_levels(Some(studio.form().await.level)),
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

/// Handle a studio event and print appropriate output.
fn handle_event(event: StudioEvent) {
    match event {
        StudioEvent::CommunitiesLoaded { count, default } => {
            println!(
                "\x1b[1;32m⬤\x1b[0m {} communities, default: \x1b[1m{}\x1b[0m",
                count,
                default.unwrap_or_else(|| "none".to_string())
            );
        }
        StudioEvent::GenerationStarted { payload } => {
            tracing::debug!("generating for {:?}", payload);
        }
        StudioEvent::GenerationFinished { .. } | StudioEvent::GenerationSkipped => {}
        StudioEvent::GenerationFailed(e) => {
            eprintln!("\x1b[1;31m✗\x1b[0m Could not generate: {}", e);
        }
        StudioEvent::Exported(paths) => {
            for path in paths {
                println!("\x1b[1;34m↓\x1b[0m Saved {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_sets_payload() {
        assert_eq!(
            parse_input("https://uaibit.com\n").unwrap(),
            Input::Generate(Some("https://uaibit.com".to_string()))
        );
        assert_eq!(parse_input("").unwrap(), Input::Generate(None));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse_input(":ec q").unwrap(), Input::Level(EcLevel::Q));
        assert_eq!(parse_input(":bg #1F2937").unwrap(), Input::Background(Color::rgb(0x1F, 0x29, 0x37)));
        assert_eq!(
            parse_input(":community Bitcoin Hub").unwrap(),
            Input::Community("Bitcoin Hub".to_string())
        );
        assert_eq!(parse_input(":save svg").unwrap(), Input::Save(ExportFormat::Svg));
        assert_eq!(parse_input(":save").unwrap(), Input::Save(ExportFormat::Both));
    }

    #[test]
    fn test_bad_commands_are_reported() {
        assert!(parse_input(":ec").is_err());
        assert!(parse_input(":fg notacolor").is_err());
        assert!(parse_input(":frobnicate").is_err());
    }
}
